//! Error types for the agent runner

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors surfaced synchronously by agent control operations
///
/// Failures inside a run never show up here; they are recorded on the
/// `Run` itself.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Schedule expression could not be parsed
    #[error("Invalid schedule expression '{expression}': {message}")]
    InvalidSchedule { expression: String, message: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl AgentError {
    /// Create an InvalidSchedule error
    pub fn invalid_schedule(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

impl From<newsreel_core::Error> for AgentError {
    fn from(err: newsreel_core::Error) -> Self {
        match err {
            newsreel_core::Error::InvalidInput(message) => Self::invalid_config(message),
            other => Self::invalid_config(other.to_string()),
        }
    }
}
