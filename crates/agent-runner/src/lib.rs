//! Newsreel Agent - orchestration for the news automation pipeline
//!
//! This crate runs fetch, transform and publish passes over content items,
//! keeps an in-memory history of those runs and drives them on a recurring
//! cron schedule.

mod agent;
mod clock;
mod error;
mod executor;
mod history;
mod trigger;

#[cfg(test)]
mod test_support;

pub use agent::{Agent, AgentStatus, DEFAULT_HISTORY_LIMIT};
pub use clock::{Clock, SystemClock, TokioClock};
pub use error::{AgentError, Result};
pub use executor::{Pipeline, RunExecutor, UNKNOWN_TARGET};
pub use history::RunHistory;
pub use trigger::{parse_schedule, FireFn, RecurringTrigger};
