use serde::{Deserialize, Serialize};

/// Outcome of delivering one item's artifact to one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    pub success: bool,
    pub target: String,
    /// Remote reference, e.g. the post id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishResult {
    pub fn succeeded(target: impl Into<String>, reference: Option<String>) -> Self {
        Self {
            success: true,
            target: target.into(),
            reference,
            error: None,
        }
    }

    pub fn failed(target: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            target: target.into(),
            reference: None,
            error: Some(error.into()),
        }
    }
}

/// Whether a publish target can actually post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStatus {
    pub name: String,
    pub configured: bool,
}
