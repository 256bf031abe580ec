//! Run history - append-only in-memory ledger of completed runs
//!
//! Runs become visible only once fully built; readers see a run whole or
//! not at all. The ledger lives for the process lifetime.

use std::sync::Arc;

use tokio::sync::RwLock;

use newsreel_core::run::Run;

#[derive(Debug, Default)]
pub struct RunHistory {
    runs: RwLock<Vec<Arc<Run>>>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed run
    pub async fn append(&self, run: Run) -> Arc<Run> {
        let run = Arc::new(run);
        self.runs.write().await.push(Arc::clone(&run));
        run
    }

    /// The most recent `limit` runs, newest first
    pub async fn recent(&self, limit: usize) -> Vec<Run> {
        let runs = self.runs.read().await;
        runs.iter().rev().take(limit).map(|run| (**run).clone()).collect()
    }

    /// The most recently appended run
    pub async fn last(&self) -> Option<Run> {
        self.runs.read().await.last().map(|run| (**run).clone())
    }

    /// Number of runs recorded so far
    pub async fn count(&self) -> usize {
        self.runs.read().await.len()
    }
}
