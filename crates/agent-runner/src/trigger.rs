//! Recurring trigger - fires a job on a cron schedule
//!
//! The trigger owns one background loop while active. Each fire spawns the
//! job as its own task, so a slow or hanging job never delays the next fire
//! and a panicking job never tears the loop down.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cron::Schedule;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use newsreel_core::config::ScheduleExpression;

use crate::clock::Clock;
use crate::error::{AgentError, Result};

/// Job invoked on every fire
pub type FireFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

enum TriggerState {
    Inactive,
    Active {
        expression: ScheduleExpression,
        handle: JoinHandle<()>,
    },
}

/// Cancellable repeating-timer task driven by a cron schedule
pub struct RecurringTrigger {
    clock: Arc<dyn Clock>,
    state: Mutex<TriggerState>,
}

impl RecurringTrigger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(TriggerState::Inactive),
        }
    }

    /// Start firing on `expression`
    ///
    /// Returns `Ok(false)` without touching the running schedule if the
    /// trigger is already active.
    pub async fn start(&self, expression: &ScheduleExpression, fire: FireFn) -> Result<bool> {
        let mut state = self.state.lock().await;
        if matches!(*state, TriggerState::Active { .. }) {
            debug!("Trigger already active, ignoring start");
            return Ok(false);
        }

        let schedule = parse_schedule(expression)?;
        *state = self.spawn(expression, schedule, fire);
        Ok(true)
    }

    /// Stop firing. Returns whether the trigger was active.
    ///
    /// Jobs already spawned by earlier fires keep running.
    pub async fn stop(&self) -> bool {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, TriggerState::Inactive) {
            TriggerState::Active { expression, handle } => {
                handle.abort();
                info!("Stopped schedule '{}'", expression);
                true
            }
            TriggerState::Inactive => false,
        }
    }

    /// Replace the running schedule if active. Returns whether it restarted.
    ///
    /// The new expression is parsed before the old loop is cancelled, so a
    /// bad expression leaves the current schedule in place.
    pub async fn restart(&self, expression: &ScheduleExpression, fire: FireFn) -> Result<bool> {
        let mut state = self.state.lock().await;
        let TriggerState::Active { handle, .. } = &*state else {
            return Ok(false);
        };

        let schedule = parse_schedule(expression)?;
        handle.abort();
        *state = self.spawn(expression, schedule, fire);
        Ok(true)
    }

    pub async fn is_active(&self) -> bool {
        matches!(*self.state.lock().await, TriggerState::Active { .. })
    }

    /// Expression currently driving the trigger, if active
    #[cfg(test)]
    pub async fn expression(&self) -> Option<ScheduleExpression> {
        match &*self.state.lock().await {
            TriggerState::Active { expression, .. } => Some(expression.clone()),
            TriggerState::Inactive => None,
        }
    }

    fn spawn(&self, expression: &ScheduleExpression, schedule: Schedule, fire: FireFn) -> TriggerState {
        info!("Starting schedule '{}'", expression);
        let handle = tokio::spawn(run_schedule(schedule, Arc::clone(&self.clock), fire));
        TriggerState::Active {
            expression: expression.clone(),
            handle,
        }
    }
}

impl Drop for RecurringTrigger {
    fn drop(&mut self) {
        if let TriggerState::Active { handle, .. } = self.state.get_mut() {
            handle.abort();
        }
    }
}

/// Parse a cron expression, accepting the classic five-field form
///
/// Five fields (minute first) get a leading `0` seconds field; six and
/// seven field expressions are handed to `cron` unchanged.
pub fn parse_schedule(expression: &ScheduleExpression) -> Result<Schedule> {
    let raw = expression.as_str().trim();
    let normalized = if raw.split_whitespace().count() == 5 {
        format!("0 {}", raw)
    } else {
        raw.to_string()
    };

    Schedule::from_str(&normalized)
        .map_err(|e| AgentError::invalid_schedule(raw, e.to_string()))
}

async fn run_schedule(schedule: Schedule, clock: Arc<dyn Clock>, fire: FireFn) {
    let mut last_fire: Option<DateTime<Utc>> = None;

    loop {
        let now = clock.now();
        // Never compute the next fire from before the last one
        let from = match last_fire {
            Some(last) if last > now => last,
            _ => now,
        };

        let Some(next) = schedule.after(&from).next() else {
            warn!("Schedule has no upcoming fire times, trigger loop exiting");
            return;
        };

        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
        last_fire = Some(next);

        debug!(fire_at = %next, "Trigger fired");
        let job = fire();
        tokio::spawn(async move {
            if let Err(panic) = AssertUnwindSafe(job).catch_unwind().await {
                error!("Scheduled run panicked: {}", panic_message(panic.as_ref()));
            }
        });
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
