//! Run - one pass of the fetch, transform, publish pipeline
//!
//! A Run is built up by the executor and frozen once it is handed to the
//! history ledger. Its status is always derived from its results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::ContentItem;
use crate::publish::PublishResult;

/// Aggregate outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Partial,
    Failed,
}

impl RunStatus {
    /// Classify a result set: success if every result succeeded, failed if
    /// none did (or there are none), partial otherwise
    pub fn classify(results: &[PublishResult]) -> Self {
        let successes = results.iter().filter(|r| r.success).count();
        if successes == 0 {
            Self::Failed
        } else if successes < results.len() {
            Self::Partial
        } else {
            Self::Success
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

/// What invoked the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunTrigger {
    Manual,
    Scheduled,
}

/// Execution record for one pipeline pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: String,
    pub trigger: RunTrigger,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    /// Items attempted, in source order
    pub items: Vec<ContentItem>,
    /// Results in item-then-target order
    pub results: Vec<PublishResult>,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Run {
    /// Start a new run record with a fresh id
    pub fn start(trigger: RunTrigger) -> Self {
        Self {
            id: format!("run-{}", Uuid::new_v4()),
            trigger,
            started_at: Utc::now(),
            finished_at: None,
            duration_ms: None,
            items: Vec::new(),
            results: Vec::new(),
            status: RunStatus::Failed,
            error: None,
        }
    }

    /// Close the run: derive status from results and stamp the end time
    pub fn finish(mut self) -> Self {
        self.status = RunStatus::classify(&self.results);
        self.stamp_end();
        self
    }

    /// Close the run as failed before any item was processed
    pub fn abort(mut self, error: impl Into<String>) -> Self {
        self.items.clear();
        self.results.clear();
        self.status = RunStatus::Failed;
        self.error = Some(error.into());
        self.stamp_end();
        self
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    fn stamp_end(&mut self) {
        let ended = Utc::now();
        self.finished_at = Some(ended);
        let duration = ended.signed_duration_since(self.started_at);
        self.duration_ms = Some(duration.num_milliseconds().max(0) as u64);
    }
}
