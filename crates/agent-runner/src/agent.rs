//! Agent - configuration, schedule and history behind one handle
//!
//! Manual and scheduled runs both go through [`RunExecutor::execute`]. The
//! configuration is swapped as a whole on update; readers clone the current
//! `Arc` and never see a half-applied change.

use std::sync::{Arc, Weak};

use futures::FutureExt;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use newsreel_core::config::{AgentConfig, AgentConfigPatch};
use newsreel_core::run::{Run, RunTrigger};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::executor::{Pipeline, RunExecutor};
use crate::history::RunHistory;
use crate::trigger::{parse_schedule, FireFn, RecurringTrigger};

/// Default number of runs returned by [`Agent::run_history`] callers
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Read-only snapshot of the agent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    pub is_active: bool,
    pub config: AgentConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<Run>,
    pub total_runs: usize,
}

/// Shared handle to one agent instance
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

struct AgentInner {
    config: RwLock<Arc<AgentConfig>>,
    /// Serializes start, stop and config updates
    lifecycle: Mutex<()>,
    executor: RunExecutor,
    history: Arc<RunHistory>,
    trigger: RecurringTrigger,
}

impl Agent {
    /// Create an agent driven by the system clock
    pub fn new(config: AgentConfig, pipeline: Pipeline) -> Result<Self> {
        Self::with_clock(config, pipeline, Arc::new(SystemClock))
    }

    /// Create an agent whose schedule follows `clock`
    pub fn with_clock(config: AgentConfig, pipeline: Pipeline, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let history = Arc::new(RunHistory::new());
        Ok(Self {
            inner: Arc::new(AgentInner {
                config: RwLock::new(Arc::new(config)),
                lifecycle: Mutex::new(()),
                executor: RunExecutor::new(pipeline, Arc::clone(&history)),
                history,
                trigger: RecurringTrigger::new(clock),
            }),
        })
    }

    /// Current configuration snapshot
    pub async fn config(&self) -> Arc<AgentConfig> {
        Arc::clone(&*self.inner.config.read().await)
    }

    pub fn pipeline(&self) -> &Pipeline {
        self.inner.executor.pipeline()
    }

    /// Run the pipeline now over at most `item_count` items
    pub async fn run_once(&self, item_count: usize) -> Run {
        let config = self.config().await;
        self.inner
            .executor
            .execute(&config, item_count, RunTrigger::Manual)
            .await
    }

    /// Start the recurring schedule. Returns `Ok(false)` if already active.
    pub async fn start_scheduled(&self) -> Result<bool> {
        let _guard = self.inner.lifecycle.lock().await;
        let config = self.config().await;
        let started = self.inner.trigger.start(&config.interval, self.fire_fn()).await?;
        if started {
            info!("Scheduled agent started with '{}'", config.interval);
        }
        Ok(started)
    }

    /// Stop the recurring schedule. Returns whether it was active.
    pub async fn stop_scheduled(&self) -> bool {
        let _guard = self.inner.lifecycle.lock().await;
        let stopped = self.inner.trigger.stop().await;
        if stopped {
            info!("Scheduled agent stopped");
        }
        stopped
    }

    /// Merge `patch` into the configuration
    ///
    /// If the schedule is active it is restarted with the merged config, so
    /// the running schedule always matches the latest applied config. On
    /// error nothing changes.
    pub async fn update_config(&self, patch: AgentConfigPatch) -> Result<Arc<AgentConfig>> {
        let _guard = self.inner.lifecycle.lock().await;

        let next = self.config().await.merged(&patch);
        next.validate()?;

        let active = self.inner.trigger.is_active().await;
        if active {
            parse_schedule(&next.interval)?;
        }

        let next = self.replace_config(next).await;

        if active {
            self.inner.trigger.restart(&next.interval, self.fire_fn()).await?;
            info!("Schedule restarted with '{}'", next.interval);
        }

        Ok(next)
    }

    /// Merge `patch` and start the schedule in one step
    ///
    /// The merged interval is parsed before anything is applied, so a
    /// rejected request leaves both config and schedule as they were. If the
    /// schedule is already active it is restarted with the merged config and
    /// `Ok(false)` is returned.
    pub async fn start_scheduled_with(&self, patch: AgentConfigPatch) -> Result<bool> {
        let _guard = self.inner.lifecycle.lock().await;

        let next = self.config().await.merged(&patch);
        next.validate()?;
        parse_schedule(&next.interval)?;

        let next = self.replace_config(next).await;

        if self.inner.trigger.restart(&next.interval, self.fire_fn()).await? {
            info!("Schedule restarted with '{}'", next.interval);
            return Ok(false);
        }

        let started = self.inner.trigger.start(&next.interval, self.fire_fn()).await?;
        if started {
            info!("Scheduled agent started with '{}'", next.interval);
        }
        Ok(started)
    }

    async fn replace_config(&self, next: AgentConfig) -> Arc<AgentConfig> {
        let next = Arc::new(next);
        *self.inner.config.write().await = Arc::clone(&next);
        next
    }

    pub async fn is_active(&self) -> bool {
        self.inner.trigger.is_active().await
    }

    pub async fn status(&self) -> AgentStatus {
        AgentStatus {
            is_active: self.is_active().await,
            config: (*self.config().await).clone(),
            last_run: self.inner.history.last().await,
            total_runs: self.inner.history.count().await,
        }
    }

    /// The most recent `limit` runs, newest first
    pub async fn run_history(&self, limit: usize) -> Vec<Run> {
        self.inner.history.recent(limit).await
    }

    /// Job handed to the trigger; holds only a weak reference to the agent
    fn fire_fn(&self) -> FireFn {
        let weak: Weak<AgentInner> = Arc::downgrade(&self.inner);
        Arc::new(move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let config = Arc::clone(&*inner.config.read().await);
                inner
                    .executor
                    .execute(&config, config.max_items_per_run, RunTrigger::Scheduled)
                    .await;
            }
            .boxed()
        })
    }
}
