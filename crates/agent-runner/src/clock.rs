//! Wall-clock sources for the recurring trigger

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Source of the current UTC time
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock anchored to tokio's timer
///
/// Reports `origin` plus the tokio time elapsed since construction. Under a
/// paused runtime (`tokio::time::pause`) it advances only when tokio time
/// does, which keeps schedule tests deterministic.
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: DateTime<Utc>,
    anchor: Instant,
}

impl TokioClock {
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            anchor: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.anchor.elapsed()).unwrap_or(TimeDelta::zero());
        self.origin + elapsed
    }
}
