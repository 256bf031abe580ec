//! Route handlers

pub mod agent;
pub mod health;
pub mod media;
pub mod news;
pub mod publish;

use axum::{http::StatusCode, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use newsreel_core::content::ContentItem;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.to_string(),
        }),
    )
}

/// Item fields accepted from clients; only `title` is required
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl ItemPayload {
    pub fn into_item(self) -> Result<ContentItem, ApiError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Invalid item data: title is required"))?;

        let mut item = ContentItem::new(title, self.link.unwrap_or_default())
            .with_description(self.description.unwrap_or_default())
            .with_source(self.source.unwrap_or_default());
        if let Some(content) = self.content {
            item = item.with_content(content);
        }
        if let Some(published_at) = self.published_at {
            item = item.with_published_at(published_at);
        }
        Ok(item)
    }
}

/// Missing payloads are rejected the same way as untitled ones
pub fn require_item(payload: Option<ItemPayload>) -> Result<ContentItem, ApiError> {
    payload.unwrap_or_default().into_item()
}

/// All routes, unbound from state
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(agent::router())
        .merge(news::router())
        .merge(media::router())
        .merge(publish::router())
}
