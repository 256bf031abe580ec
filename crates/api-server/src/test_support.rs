//! Offline agent wiring for route tests

use std::sync::Arc;

use async_trait::async_trait;

use newsreel_agent::{Agent, Pipeline};
use newsreel_core::config::AgentConfig;
use newsreel_core::content::{ContentItem, ContentSource};
use newsreel_core::media::{Artifact, CardRenderer};
use newsreel_core::publish::{MultiTargetPublisher, PublishResult, PublishTarget, UnconfiguredTarget};
use newsreel_core::Result;

use crate::state::AppState;

/// Serves a fixed list of headlines; categories filter by source name
pub struct StaticSource {
    items: Vec<ContentItem>,
}

impl StaticSource {
    pub fn new(titles: &[&str]) -> Self {
        Self {
            items: titles
                .iter()
                .map(|title| {
                    ContentItem::new(*title, format!("https://news.example/{}", title))
                        .with_description(format!("{}. More to follow.", title))
                        .with_source("Wire")
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    async fn fetch(&self, limit: usize) -> Result<Vec<ContentItem>> {
        Ok(self.items.iter().take(limit).cloned().collect())
    }

    async fn fetch_by_category(&self, _category: &str) -> Result<Vec<ContentItem>> {
        Ok(self.items.iter().take(10).cloned().collect())
    }
}

/// Target that accepts every post
pub struct AcceptingTarget;

#[async_trait]
impl PublishTarget for AcceptingTarget {
    fn name(&self) -> &str {
        "twitter"
    }

    async fn publish(&self, item: &ContentItem, _artifact: &Artifact) -> PublishResult {
        PublishResult::succeeded("twitter", Some(format!("tw-{}", item.title)))
    }
}

/// Agent over `titles`; twitter accepts, facebook is not configured
pub fn test_state(titles: &[&str]) -> AppState {
    let publisher = MultiTargetPublisher::new()
        .with_target(Arc::new(AcceptingTarget))
        .with_target(Arc::new(UnconfiguredTarget::new("facebook")));
    let pipeline = Pipeline::new(
        Arc::new(StaticSource::new(titles)),
        Arc::new(CardRenderer::new()),
        Arc::new(publisher),
    );
    let agent = Agent::new(AgentConfig::default(), pipeline).unwrap();
    AppState::new(agent)
}
