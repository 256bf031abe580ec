//! Content items and the sources that supply them

mod model;
mod rss;
mod source;

pub use model::ContentItem;
pub use rss::{parse_feed, RssFeedSource, DEFAULT_FEEDS};
pub use source::ContentSource;
