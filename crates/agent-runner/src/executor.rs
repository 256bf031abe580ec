//! Run executor - drives one fetch, transform, publish pass
//!
//! `execute` never returns an error. Source, transform and publish failures
//! are all folded into the returned `Run`, which is appended to history
//! before it is handed back.

use std::sync::Arc;

use tracing::{info, warn};

use newsreel_core::config::AgentConfig;
use newsreel_core::content::{ContentItem, ContentSource};
use newsreel_core::media::MediaTransformer;
use newsreel_core::publish::{PublishResult, Publisher};
use newsreel_core::run::{Run, RunTrigger};

use crate::history::RunHistory;

/// Target name used for results synthesized from a transform failure
pub const UNKNOWN_TARGET: &str = "unknown";

/// The three external collaborators a run calls into
#[derive(Clone)]
pub struct Pipeline {
    pub source: Arc<dyn ContentSource>,
    pub transformer: Arc<dyn MediaTransformer>,
    pub publisher: Arc<dyn Publisher>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn ContentSource>,
        transformer: Arc<dyn MediaTransformer>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            source,
            transformer,
            publisher,
        }
    }
}

/// Executes pipeline passes and records them
pub struct RunExecutor {
    pipeline: Pipeline,
    history: Arc<RunHistory>,
}

impl RunExecutor {
    pub fn new(pipeline: Pipeline, history: Arc<RunHistory>) -> Self {
        Self { pipeline, history }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run the pipeline over at most `item_count` items
    ///
    /// `item_count` is independent of `config.max_items_per_run`; the config
    /// only supplies the category filter.
    pub async fn execute(&self, config: &AgentConfig, item_count: usize, trigger: RunTrigger) -> Run {
        let run = Run::start(trigger);
        info!(run_id = %run.id, ?trigger, "Starting agent run");

        let run = match self.fetch_items(config, item_count).await {
            Err(e) => {
                warn!(run_id = %run.id, "Content source failed: {}", e);
                run.abort(format!("Content source failed: {}", e))
            }
            Ok(items) if items.is_empty() => {
                warn!(run_id = %run.id, "No content items found");
                run.abort("No content items found")
            }
            Ok(_) if item_count == 0 => run.abort("Item count is 0, nothing to process"),
            Ok(items) => {
                info!(run_id = %run.id, "Found {} items", items.len());
                let batch: Vec<ContentItem> = items.into_iter().take(item_count).collect();
                self.process(run, batch).await
            }
        };

        info!(
            run_id = %run.id,
            status = run.status.as_str(),
            successes = run.success_count(),
            attempts = run.results.len(),
            "Agent run completed"
        );

        self.history.append(run.clone()).await;
        run
    }

    async fn fetch_items(&self, config: &AgentConfig, item_count: usize) -> newsreel_core::Result<Vec<ContentItem>> {
        match config.category.as_deref() {
            Some(category) => self.pipeline.source.fetch_by_category(category).await,
            None => self.pipeline.source.fetch(item_count).await,
        }
    }

    /// Process items strictly one after another
    async fn process(&self, mut run: Run, batch: Vec<ContentItem>) -> Run {
        for item in &batch {
            info!(run_id = %run.id, "Processing: {}", item.title);

            match self.pipeline.transformer.transform(item).await {
                Ok(artifact) => {
                    let results = self.pipeline.publisher.publish(item, &artifact).await;
                    let posted = results.iter().filter(|r| r.success).count();
                    info!(
                        run_id = %run.id,
                        "Posted to {}/{} targets",
                        posted,
                        results.len()
                    );
                    run.results.extend(results);
                }
                Err(e) => {
                    warn!(run_id = %run.id, "Error processing '{}': {}", item.title, e);
                    run.results.push(PublishResult::failed(UNKNOWN_TARGET, e.to_string()));
                }
            }
        }

        run.items = batch;
        run.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{items, pipeline, FakePublisher, FakeSource, FakeTransformer};
    use newsreel_core::run::RunStatus;

    fn executor(source: Arc<FakeSource>, transformer: FakeTransformer, publisher: FakePublisher) -> (RunExecutor, Arc<RunHistory>) {
        let history = Arc::new(RunHistory::new());
        let executor = RunExecutor::new(pipeline(source, transformer, publisher), Arc::clone(&history));
        (executor, history)
    }

    #[tokio::test]
    async fn test_empty_source_fails_without_processing() {
        let source = Arc::new(FakeSource::empty());
        let (executor, history) = executor(source, FakeTransformer::new(), FakePublisher::new(&[("twitter", true)]));

        let run = executor.execute(&AgentConfig::default(), 3, RunTrigger::Manual).await;

        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.items.is_empty());
        assert!(run.results.is_empty());
        assert_eq!(run.error.as_deref(), Some("No content items found"));
        assert_eq!(history.count().await, 1);
    }

    #[tokio::test]
    async fn test_source_error_is_recorded_on_run() {
        let source = Arc::new(FakeSource::failing());
        let (executor, history) = executor(source, FakeTransformer::new(), FakePublisher::new(&[("twitter", true)]));

        let run = executor.execute(&AgentConfig::default(), 1, RunTrigger::Manual).await;

        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.items.is_empty());
        assert!(run.error.unwrap().contains("feed unreachable"));
        assert_eq!(history.last().await.unwrap().status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn test_transform_failure_yields_single_synthetic_result() {
        let source = Arc::new(FakeSource::with_items(items(&["one", "two", "three"])));
        let (executor, _history) = executor(
            source,
            FakeTransformer::new().failing_on("two"),
            FakePublisher::new(&[("twitter", true), ("facebook", true)]),
        );

        let run = executor.execute(&AgentConfig::default(), 3, RunTrigger::Manual).await;

        // 2 targets for item one, 1 synthetic for item two, 2 for item three
        assert_eq!(run.results.len(), 5);
        assert_eq!(run.items.len(), 3);
        let targets: Vec<&str> = run.results.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, vec!["twitter", "facebook", "unknown", "twitter", "facebook"]);
        assert!(!run.results[2].success);
        assert!(run.results[2].error.as_ref().unwrap().contains("renderer crashed"));
        assert_eq!(run.status, RunStatus::Partial);
        assert!(run.error.is_none());
    }

    #[tokio::test]
    async fn test_results_follow_item_then_target_order() {
        let source = Arc::new(FakeSource::with_items(items(&["a", "b"])));
        let (executor, _history) = executor(
            source,
            FakeTransformer::new(),
            FakePublisher::new(&[("twitter", true), ("facebook", false), ("instagram", false)]),
        );

        let run = executor.execute(&AgentConfig::default(), 2, RunTrigger::Manual).await;

        let refs: Vec<Option<&str>> = run.results.iter().map(|r| r.reference.as_deref()).collect();
        assert_eq!(refs, vec![Some("twitter:a"), None, None, Some("twitter:b"), None, None]);
        assert_eq!(run.status, RunStatus::Partial);
    }

    #[tokio::test]
    async fn test_all_targets_succeed() {
        let source = Arc::new(FakeSource::with_items(items(&["a"])));
        let (executor, _history) = executor(source, FakeTransformer::new(), FakePublisher::new(&[("twitter", true)]));

        let run = executor.execute(&AgentConfig::default(), 1, RunTrigger::Scheduled).await;

        assert_eq!(run.status, RunStatus::Success);
        assert_eq!(run.trigger, RunTrigger::Scheduled);
        assert!(run.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_every_attempt_failing_is_failed() {
        let source = Arc::new(FakeSource::with_items(items(&["a", "b"])));
        let (executor, _history) = executor(
            source,
            FakeTransformer::new().failing_on("a"),
            FakePublisher::new(&[("facebook", false)]),
        );

        let run = executor.execute(&AgentConfig::default(), 2, RunTrigger::Manual).await;

        assert_eq!(run.results.len(), 2);
        assert_eq!(run.status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn test_batch_truncated_in_source_order() {
        let source = Arc::new(FakeSource::with_items(items(&["a", "b", "c", "d", "e"])));
        let (executor, _history) = executor(Arc::clone(&source), FakeTransformer::new(), FakePublisher::new(&[("twitter", true)]));

        let config = AgentConfig {
            max_items_per_run: 5,
            ..AgentConfig::default()
        };
        let run = executor.execute(&config, 2, RunTrigger::Manual).await;

        let titles: Vec<&str> = run.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(*source.limits.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_category_routes_to_category_fetch() {
        let source = Arc::new(FakeSource::with_items(items(&["a"])));
        let (executor, _history) = executor(Arc::clone(&source), FakeTransformer::new(), FakePublisher::new(&[("twitter", true)]));

        let config = AgentConfig {
            category: Some("technology".to_string()),
            ..AgentConfig::default()
        };
        executor.execute(&config, 1, RunTrigger::Manual).await;

        assert_eq!(*source.categories.lock().unwrap(), vec!["technology".to_string()]);
        assert!(source.limits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_item_count_processes_nothing() {
        let source = Arc::new(FakeSource::with_items(items(&["a"])));
        let (executor, _history) = executor(source, FakeTransformer::new(), FakePublisher::new(&[("twitter", true)]));

        let run = executor.execute(&AgentConfig::default(), 0, RunTrigger::Manual).await;

        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.items.is_empty());
        assert!(run.error.is_some());
    }
}
