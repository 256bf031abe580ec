//! Agent configuration
//!
//! `AgentConfig` is an immutable snapshot. Updates go through
//! [`AgentConfigPatch`], which produces a new snapshot and leaves the old
//! one untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::Result;

/// Every six hours, on the hour
pub const DEFAULT_INTERVAL: &str = "0 */6 * * *";

/// Cron-style schedule, passed through to the recurring trigger as-is
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleExpression(String);

impl ScheduleExpression {
    pub fn new(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScheduleExpression {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ScheduleExpression {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Agent configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Start the recurring schedule when the process boots
    pub auto_post: bool,
    pub interval: ScheduleExpression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub max_items_per_run: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            auto_post: false,
            interval: ScheduleExpression::new(DEFAULT_INTERVAL),
            category: None,
            max_items_per_run: 1,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_items_per_run == 0 {
            return Err(Error::InvalidInput(
                "maxItemsPerRun must be a positive integer".to_string(),
            ));
        }
        if self.interval.as_str().trim().is_empty() {
            return Err(Error::InvalidInput("interval must not be empty".to_string()));
        }
        Ok(())
    }

    /// Shallow override: fields present in the patch win, the rest are kept
    pub fn merged(&self, patch: &AgentConfigPatch) -> Self {
        let category = match &patch.category {
            Some(c) if c.trim().is_empty() => None,
            Some(c) => Some(c.trim().to_string()),
            None => self.category.clone(),
        };

        Self {
            auto_post: patch.auto_post.unwrap_or(self.auto_post),
            interval: patch
                .interval
                .clone()
                .unwrap_or_else(|| self.interval.clone()),
            category,
            max_items_per_run: patch.max_items_per_run.unwrap_or(self.max_items_per_run),
        }
    }
}

/// Partial configuration update
///
/// An empty `category` string clears the category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfigPatch {
    #[serde(default)]
    pub auto_post: Option<bool>,
    #[serde(default)]
    pub interval: Option<ScheduleExpression>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "maxArticlesPerRun")]
    pub max_items_per_run: Option<usize>,
}

impl AgentConfigPatch {
    pub fn with_interval(mut self, interval: impl Into<ScheduleExpression>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_max_items_per_run(mut self, max: usize) -> Self {
        self.max_items_per_run = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert!(!config.auto_post);
        assert_eq!(config.interval.as_str(), "0 */6 * * *");
        assert_eq!(config.max_items_per_run, 1);
        assert!(config.category.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let base = AgentConfig {
            category: Some("technology".to_string()),
            ..AgentConfig::default()
        };
        let merged = base.merged(&AgentConfigPatch::default().with_max_items_per_run(3));

        assert_eq!(merged.max_items_per_run, 3);
        assert_eq!(merged.category.as_deref(), Some("technology"));
        assert_eq!(merged.interval, base.interval);
        // Source snapshot is untouched
        assert_eq!(base.max_items_per_run, 1);
    }

    #[test]
    fn test_empty_category_clears() {
        let base = AgentConfig {
            category: Some("sports".to_string()),
            ..AgentConfig::default()
        };
        let merged = base.merged(&AgentConfigPatch::default().with_category(""));
        assert!(merged.category.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_items() {
        let config = AgentConfig::default().merged(&AgentConfigPatch::default().with_max_items_per_run(0));
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_patch_accepts_legacy_field_name() {
        let patch: AgentConfigPatch =
            serde_json::from_str(r#"{"maxArticlesPerRun": 4, "interval": "*/5 * * * *"}"#).unwrap();
        assert_eq!(patch.max_items_per_run, Some(4));
        assert_eq!(patch.interval.unwrap().as_str(), "*/5 * * * *");
        assert!(patch.category.is_none());
    }
}
