//! Content source trait
//!
//! Defines the interface the run executor uses to pull items.

use async_trait::async_trait;

use super::model::ContentItem;
use crate::Result;

/// Supplier of content items
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch up to `limit` of the latest items across all default feeds
    async fn fetch(&self, limit: usize) -> Result<Vec<ContentItem>>;

    /// Fetch items for a named category
    async fn fetch_by_category(&self, category: &str) -> Result<Vec<ContentItem>>;
}
