//! Direct publish endpoints
//!
//! Publishes a single item outside of a run. Nothing is recorded in the
//! run history.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use newsreel_core::media::Artifact;
use newsreel_core::publish::{PublishResult, TargetStatus};

use super::{api_error, require_item, ApiError, ItemPayload};
use crate::state::AppState;

/// Assumed when `media` is plain base64 without a `data:` prefix
const DEFAULT_MEDIA_TYPE: &str = "image/png";

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(default, alias = "article")]
    pub item: Option<ItemPayload>,
    /// Base64 media, optionally as a `data:` URL; rendered when absent
    #[serde(default)]
    pub media: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub results: Vec<PublishResult>,
}

#[derive(Debug, Serialize)]
pub struct TargetsResponse {
    pub success: bool,
    pub platforms: Vec<TargetStatus>,
}

/// POST /api/publish - Publish one item to every target
async fn publish_item(
    State(state): State<AppState>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, ApiError> {
    let item = require_item(req.item)?;
    let pipeline = state.agent().pipeline();

    let artifact = match req.media.as_deref() {
        Some(raw) => {
            let (mime_type, media) = decode_media(raw)?;
            Artifact {
                media,
                mime_type,
                script: item.description.clone(),
                segments: Vec::new(),
            }
        }
        None => pipeline.transformer.transform(&item).await.map_err(|e| {
            tracing::error!("Failed to render '{}': {}", item.title, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        })?,
    };

    tracing::info!("Direct publish requested for '{}'", item.title);
    let results = pipeline.publisher.publish(&item, &artifact).await;

    Ok(Json(PublishResponse {
        success: true,
        results,
    }))
}

/// GET /api/publish - Which targets have credentials
async fn list_targets(State(state): State<AppState>) -> Json<TargetsResponse> {
    Json(TargetsResponse {
        success: true,
        platforms: state.agent().pipeline().publisher.targets(),
    })
}

fn decode_media(raw: &str) -> Result<(String, Vec<u8>), ApiError> {
    let (mime_type, data) = match raw
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    {
        Some((mime_type, data)) => (mime_type.to_string(), data),
        None => (DEFAULT_MEDIA_TYPE.to_string(), raw),
    };

    let media = BASE64
        .decode(data.trim())
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid media encoding: {}", e)))?;
    Ok((mime_type, media))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/publish", post(publish_item).get(list_targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::test_support::test_state;

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response: Response = router().with_state(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/publish")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn publish_reports_every_target() {
        let state = test_state(&[]);

        let (status, payload) = send(&state, post_json(json!({ "item": { "title": "Markets rally" } }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["success"], true);
        let results = payload["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["target"], "twitter");
        assert_eq!(results[0]["reference"], "tw-Markets rally");
        assert_eq!(results[1]["success"], false);
        assert_eq!(results[1]["error"], "facebook credentials not configured");

        // Direct publishes are not runs
        assert_eq!(state.agent().status().await.total_runs, 0);
    }

    #[tokio::test]
    async fn publish_accepts_supplied_media() {
        let state = test_state(&[]);

        let (status, payload) = send(
            &state,
            post_json(json!({
                "article": { "title": "Storm warning" },
                "media": "data:image/png;base64,aGVsbG8="
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["results"][0]["success"], true);
    }

    #[tokio::test]
    async fn publish_rejects_bad_media() {
        let state = test_state(&[]);

        let (status, payload) = send(
            &state,
            post_json(json!({ "item": { "title": "Storm warning" }, "media": "!!not base64!!" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].as_str().unwrap().contains("Invalid media encoding"));
    }

    #[tokio::test]
    async fn publish_requires_title() {
        let state = test_state(&[]);

        let (status, payload) = send(&state, post_json(json!({ "item": { "title": "  " } }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["success"], false);
    }

    #[tokio::test]
    async fn targets_report_configuration() {
        let state = test_state(&[]);
        let request = Request::builder().uri("/api/publish").body(Body::empty()).unwrap();

        let (status, payload) = send(&state, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload["platforms"],
            json!([
                { "name": "twitter", "configured": true },
                { "name": "facebook", "configured": false }
            ])
        );
    }

    #[test]
    fn decode_media_reads_data_urls() {
        let (mime_type, media) = decode_media("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(mime_type, "image/jpeg");
        assert_eq!(media, b"hello");

        let (mime_type, media) = decode_media("aGVsbG8=").unwrap();
        assert_eq!(mime_type, DEFAULT_MEDIA_TYPE);
        assert_eq!(media, b"hello");
    }
}
