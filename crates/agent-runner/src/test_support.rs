//! In-memory collaborators for executor and agent tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use newsreel_core::content::{ContentItem, ContentSource};
use newsreel_core::media::{Artifact, MediaTransformer};
use newsreel_core::publish::{PublishResult, Publisher, TargetStatus};
use newsreel_core::{Error, Result};

use crate::executor::Pipeline;

pub fn item(title: &str) -> ContentItem {
    ContentItem::new(title, format!("https://example.com/{}", title.replace(' ', "-")))
        .with_description(format!("{} happened today.", title))
        .with_source("Test Wire")
}

pub fn items(titles: &[&str]) -> Vec<ContentItem> {
    titles.iter().map(|t| item(t)).collect()
}

/// Source that serves queued batches, then a fallback batch forever
#[derive(Default)]
pub struct FakeSource {
    queued: Mutex<VecDeque<Vec<ContentItem>>>,
    fallback: Vec<ContentItem>,
    fail: bool,
    pub limits: Mutex<Vec<usize>>,
    pub categories: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_items(items: Vec<ContentItem>) -> Self {
        Self {
            fallback: items,
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sequence(batches: Vec<Vec<ContentItem>>) -> Self {
        Self {
            queued: Mutex::new(batches.into()),
            ..Self::default()
        }
    }

    fn next_batch(&self) -> Result<Vec<ContentItem>> {
        if self.fail {
            return Err(Error::Source("feed unreachable".to_string()));
        }
        let queued = self.queued.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| self.fallback.clone()))
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn fetch(&self, limit: usize) -> Result<Vec<ContentItem>> {
        self.limits.lock().unwrap().push(limit);
        self.next_batch()
    }

    async fn fetch_by_category(&self, category: &str) -> Result<Vec<ContentItem>> {
        self.categories.lock().unwrap().push(category.to_string());
        self.next_batch()
    }
}

/// Transformer that fails or stalls on selected titles
#[derive(Default)]
pub struct FakeTransformer {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
}

impl FakeTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    pub fn delaying(mut self, title: &str, delay: Duration) -> Self {
        self.delays.insert(title.to_string(), delay);
        self
    }
}

#[async_trait]
impl MediaTransformer for FakeTransformer {
    async fn transform(&self, item: &ContentItem) -> Result<Artifact> {
        if let Some(delay) = self.delays.get(&item.title) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&item.title) {
            return Err(Error::Transform(format!("renderer crashed on '{}'", item.title)));
        }
        Ok(Artifact {
            media: item.title.as_bytes().to_vec(),
            mime_type: "text/plain".to_string(),
            script: item.description.clone(),
            segments: vec![item.description.clone()],
        })
    }
}

/// Publisher with a fixed set of targets, each always succeeding or failing
pub struct FakePublisher {
    targets: Vec<(String, bool)>,
}

impl FakePublisher {
    pub fn new(targets: &[(&str, bool)]) -> Self {
        Self {
            targets: targets
                .iter()
                .map(|(name, ok)| (name.to_string(), *ok))
                .collect(),
        }
    }
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn publish(&self, item: &ContentItem, _artifact: &Artifact) -> Vec<PublishResult> {
        self.targets
            .iter()
            .map(|(name, ok)| {
                if *ok {
                    PublishResult::succeeded(name, Some(format!("{}:{}", name, item.title)))
                } else {
                    PublishResult::failed(name, format!("{} credentials not configured", name))
                }
            })
            .collect()
    }

    fn targets(&self) -> Vec<TargetStatus> {
        self.targets
            .iter()
            .map(|(name, _)| TargetStatus {
                name: name.clone(),
                configured: true,
            })
            .collect()
    }
}

pub fn pipeline(
    source: Arc<FakeSource>,
    transformer: FakeTransformer,
    publisher: FakePublisher,
) -> Pipeline {
    Pipeline::new(source, Arc::new(transformer), Arc::new(publisher))
}
