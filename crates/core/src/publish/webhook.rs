//! Webhook publish target
//!
//! Posts a JSON payload to an HTTP endpoint with a bearer token. The
//! endpoint is expected to answer with a JSON object carrying the remote
//! post `id`.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use super::caption::compose_caption;
use super::publisher::PublishTarget;
use super::result::PublishResult;
use crate::content::ContentItem;
use crate::media::Artifact;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRequest<'a> {
    caption: String,
    title: &'a str,
    link: &'a str,
    media_type: &'a str,
    media: String,
}

/// Target that forwards posts to an authenticated HTTP endpoint
#[derive(Debug, Clone)]
pub struct WebhookTarget {
    client: Client,
    name: String,
    endpoint: String,
    token: String,
    caption_limit: usize,
}

impl WebhookTarget {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        caption_limit: usize,
    ) -> Self {
        Self {
            client: Client::new(),
            name: name.into(),
            endpoint: endpoint.into(),
            token: token.into(),
            caption_limit,
        }
    }

    async fn post(&self, item: &ContentItem, artifact: &Artifact) -> Result<Option<String>, String> {
        let req = PostRequest {
            caption: compose_caption(item, self.caption_limit),
            title: &item.title,
            link: &item.link,
            media_type: &artifact.mime_type,
            media: BASE64.encode(&artifact.media),
        };

        info!("Posting to {}: {}", self.name, self.endpoint);

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&req)
            .send()
            .await
            .map_err(|e| format!("Failed to reach {}: {}", self.name, e))?;

        let status = res.status();
        if !status.is_success() {
            let error_text = res.text().await.unwrap_or_default();
            return Err(format!("{} returned {}: {}", self.name, status, error_text));
        }

        let body: serde_json::Value = res.json().await.unwrap_or_default();
        Ok(body
            .get("id")
            .and_then(|id| match id {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            }))
    }
}

#[async_trait]
impl PublishTarget for WebhookTarget {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, item: &ContentItem, artifact: &Artifact) -> PublishResult {
        match self.post(item, artifact).await {
            Ok(reference) => PublishResult::succeeded(&self.name, reference),
            Err(error) => PublishResult::failed(&self.name, error),
        }
    }
}
