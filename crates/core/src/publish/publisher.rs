//! Publisher traits and the multi-target publisher
//!
//! A [`Publisher`] fans one item out to a set of named targets. Each
//! target reports independently; a target that cannot post (for example
//! because no credentials were supplied) still reports a failed result
//! instead of being left out.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::result::{PublishResult, TargetStatus};
use crate::content::ContentItem;
use crate::media::Artifact;

/// Delivers an item and its artifact to every configured target
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish to all targets, one result per target in attempt order
    async fn publish(&self, item: &ContentItem, artifact: &Artifact) -> Vec<PublishResult>;

    /// Targets in attempt order
    fn targets(&self) -> Vec<TargetStatus>;
}

/// A single named publishing destination
#[async_trait]
pub trait PublishTarget: Send + Sync {
    fn name(&self) -> &str;

    fn is_configured(&self) -> bool {
        true
    }

    async fn publish(&self, item: &ContentItem, artifact: &Artifact) -> PublishResult;
}

/// Target with no credentials; always fails with the same message
#[derive(Debug, Clone)]
pub struct UnconfiguredTarget {
    name: String,
}

impl UnconfiguredTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl PublishTarget for UnconfiguredTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn publish(&self, _item: &ContentItem, _artifact: &Artifact) -> PublishResult {
        PublishResult::failed(&self.name, format!("{} credentials not configured", self.name))
    }
}

/// Publisher over an ordered set of targets
#[derive(Clone, Default)]
pub struct MultiTargetPublisher {
    targets: Vec<Arc<dyn PublishTarget>>,
}

impl MultiTargetPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: Arc<dyn PublishTarget>) -> Self {
        self.targets.push(target);
        self
    }
}

#[async_trait]
impl Publisher for MultiTargetPublisher {
    async fn publish(&self, item: &ContentItem, artifact: &Artifact) -> Vec<PublishResult> {
        let mut results = Vec::with_capacity(self.targets.len());

        // Sequential on purpose: targets are rate limited
        for target in &self.targets {
            let result = target.publish(item, artifact).await;
            if result.success {
                debug!("Published '{}' to {}", item.title, target.name());
            } else {
                warn!(
                    "Publishing '{}' to {} failed: {}",
                    item.title,
                    target.name(),
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        results
    }

    fn targets(&self) -> Vec<TargetStatus> {
        self.targets
            .iter()
            .map(|t| TargetStatus {
                name: t.name().to_string(),
                configured: t.is_configured(),
            })
            .collect()
    }
}
