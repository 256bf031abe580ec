//! News preview endpoint
//!
//! Reads straight from the agent's content source without starting a run.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use newsreel_core::content::ContentItem;

use super::{api_error, ApiError};
use crate::state::AppState;

const DEFAULT_NEWS_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub success: bool,
    pub items: Vec<ContentItem>,
    pub count: usize,
}

/// GET /api/news - Latest items, optionally for one category
async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<NewsResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_NEWS_LIMIT);
    let source = &state.agent().pipeline().source;

    let fetched = match query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(category) => source.fetch_by_category(category).await,
        None => source.fetch(limit).await,
    };

    let mut items = fetched.map_err(|e| {
        tracing::error!("Failed to fetch news: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
    })?;
    items.truncate(limit);

    Ok(Json(NewsResponse {
        success: true,
        count: items.len(),
        items,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/news", get(list_news))
}
