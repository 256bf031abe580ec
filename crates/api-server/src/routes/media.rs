//! Media preview endpoint
//!
//! Renders one item through the agent's transformer without publishing it.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{api_error, require_item, ApiError, ItemPayload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, alias = "article")]
    pub item: Option<ItemPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub media_type: String,
    /// Rendered media as a `data:` URL
    pub media: String,
    pub script: String,
    pub segments: Vec<String>,
}

/// POST /api/media/generate - Render an item's card and narration script
async fn generate_media(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let item = require_item(req.item)?;

    let artifact = state
        .agent()
        .pipeline()
        .transformer
        .transform(&item)
        .await
        .map_err(|e| {
            tracing::error!("Failed to render '{}': {}", item.title, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        })?;

    Ok(Json(GenerateResponse {
        success: true,
        media: format!("data:{};base64,{}", artifact.mime_type, BASE64.encode(&artifact.media)),
        media_type: artifact.mime_type,
        script: artifact.script,
        segments: artifact.segments,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/media/generate", post(generate_media))
}
