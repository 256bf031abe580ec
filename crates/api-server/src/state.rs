//! Application state

use std::sync::Arc;

use newsreel_agent::Agent;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    agent: Agent,
}

impl AppState {
    pub fn new(agent: Agent) -> Self {
        Self {
            inner: Arc::new(AppStateInner { agent }),
        }
    }

    /// Get reference to the agent
    pub fn agent(&self) -> &Agent {
        &self.inner.agent
    }
}
