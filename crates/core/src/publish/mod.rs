//! Publishing: per-target results and the multi-target publisher

mod caption;
mod publisher;
mod result;
mod webhook;

pub use caption::{compose_caption, DEFAULT_CAPTION_LIMIT, TWITTER_CAPTION_LIMIT};
pub use publisher::{MultiTargetPublisher, PublishTarget, Publisher, UnconfiguredTarget};
pub use result::{PublishResult, TargetStatus};
pub use webhook::WebhookTarget;
