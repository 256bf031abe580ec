//! Agent API endpoints
//!
//! Manual runs, schedule control and run history.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use newsreel_agent::{AgentError, AgentStatus, DEFAULT_HISTORY_LIMIT};
use newsreel_core::config::AgentConfigPatch;
use newsreel_core::run::{Run, RunStatus};

use super::{api_error, ApiError};
use crate::state::AppState;

const RECENT_RUNS: usize = 5;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default, alias = "articleCount")]
    pub item_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub success: bool,
    pub run: Run,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub status: AgentStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleAction {
    Start,
    Stop,
    Update,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub action: String,
    #[serde(default)]
    pub config: Option<AgentConfigPatch>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: String,
    pub status: AgentStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverview {
    pub success: bool,
    pub status: AgentStatus,
    pub recent_runs: Vec<Run>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub runs: Vec<Run>,
    pub count: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/agent/run - Run the pipeline now
///
/// The body is optional. A missing or zero `itemCount` means one item.
async fn run_agent(State(state): State<AppState>, body: Bytes) -> Result<Json<RunResponse>, ApiError> {
    let req: RunRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RunRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid run request: {}", e)))?
    };
    let item_count = req.item_count.filter(|n| *n > 0).unwrap_or(1);
    tracing::info!("Manual run requested for {} item(s)", item_count);

    let run = state.agent().run_once(item_count).await;
    Ok(Json(RunResponse {
        success: run.status != RunStatus::Failed,
        run,
    }))
}

/// GET /api/agent/run - Current agent status
async fn agent_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        status: state.agent().status().await,
    })
}

/// POST /api/agent/schedule - Start, stop or reconfigure the schedule
async fn control_schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let action = parse_action(&req.action)?;
    let agent = state.agent();

    let message = match action {
        ScheduleAction::Start => {
            let started = match req.config {
                Some(patch) => agent.start_scheduled_with(patch).await,
                None => agent.start_scheduled().await,
            }
            .map_err(agent_error)?;
            if started {
                "Scheduled agent started"
            } else {
                "Scheduled agent already running"
            }
        }
        ScheduleAction::Stop => {
            if agent.stop_scheduled().await {
                "Scheduled agent stopped"
            } else {
                "Scheduled agent was not running"
            }
        }
        ScheduleAction::Update => {
            let patch = req.config.ok_or_else(|| {
                api_error(StatusCode::BAD_REQUEST, "config is required for update")
            })?;
            agent.update_config(patch).await.map_err(agent_error)?;
            "Agent configuration updated"
        }
    };

    Ok(Json(ScheduleResponse {
        success: true,
        message: message.to_string(),
        status: agent.status().await,
    }))
}

/// GET /api/agent/schedule - Status plus the latest runs
async fn schedule_overview(State(state): State<AppState>) -> Json<ScheduleOverview> {
    Json(ScheduleOverview {
        success: true,
        status: state.agent().status().await,
        recent_runs: state.agent().run_history(RECENT_RUNS).await,
    })
}

/// GET /api/agent/history - Most recent runs, newest first
async fn run_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let runs = state
        .agent()
        .run_history(query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
        .await;
    Json(HistoryResponse {
        success: true,
        count: runs.len(),
        runs,
    })
}

fn parse_action(raw: &str) -> Result<ScheduleAction, ApiError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid action '{}'. Use start, stop or update", raw),
        )
    })
}

fn agent_error(err: AgentError) -> ApiError {
    tracing::warn!("Rejected agent request: {}", err);
    api_error(StatusCode::BAD_REQUEST, err)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/agent/run", post(run_agent).get(agent_status))
        .route("/api/agent/schedule", post(control_schedule).get(schedule_overview))
        .route("/api/agent/history", get(run_history))
}
