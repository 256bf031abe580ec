use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::Result;

/// Publishable media derived from one content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Rendered media bytes
    #[serde(skip)]
    pub media: Vec<u8>,
    pub mime_type: String,
    /// Narration script for the item
    pub script: String,
    /// Script split into on-screen segments
    pub segments: Vec<String>,
}

/// Converts a content item into a publishable artifact
#[async_trait]
pub trait MediaTransformer: Send + Sync {
    async fn transform(&self, item: &ContentItem) -> Result<Artifact>;
}
