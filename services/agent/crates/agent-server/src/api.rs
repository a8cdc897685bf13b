//! HTTP API.
//!
//! Every route is a `GET` answering with a JSON envelope:
//!   - success: `200 {"code":"OK","details":<result>}`
//!   - failure: `500 {"code":"ERROR","message":<text>}`
//!
//! All `/api/*` routes except `/api/hostname` require `?token=<process token>`.

use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use osagent::{AgentError, CommandRunner, LogicalVolume, Mount, OsAgent};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::token::ProcessToken;

// ===================================================================
// State
// ===================================================================

pub struct AppState<R> {
    pub agent: OsAgent<R>,
    pub token: ProcessToken,
}

type SharedState<R> = State<Arc<AppState<R>>>;

// ===================================================================
// Envelope and errors
// ===================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseCode {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: ResponseCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
}

impl<T> ApiResponse<T> {
    fn ok(details: T) -> Self {
        Self {
            code: ResponseCode::Ok,
            message: None,
            details: Some(details),
        }
    }
}

impl ApiResponse<()> {
    fn error(message: String) -> Self {
        Self {
            code: ResponseCode::Error,
            message: Some(message),
            details: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid token")]
    InvalidToken,

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(self.to_string())),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn respond<T>(result: osagent::Result<T>) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(result?)))
}

// ===================================================================
// Query parameters
// ===================================================================

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeQuery {
    #[serde(default)]
    lv: String,
}

#[derive(Debug, Default, Deserialize)]
struct PathQuery {
    #[serde(default)]
    path: String,
}

// ===================================================================
// Router
// ===================================================================

pub fn router<R: CommandRunner + 'static>(state: Arc<AppState<R>>) -> Router {
    let protected = Router::new()
        .route("/api/lvs", get(list_volumes::<R>))
        .route("/api/lvs/{pattern}", get(list_volumes_matching::<R>))
        .route("/api/lvs-snapshots", get(list_snapshot_volumes::<R>))
        .route("/api/lv", get(logical_volume::<R>))
        .route("/api/lv/{lv}", get(logical_volume_named::<R>))
        .route("/api/mount", get(get_mount::<R>))
        .route("/api/mountlv", get(mount_volume::<R>))
        .route("/api/mountlv/{lv}", get(mount_volume_named::<R>))
        .route("/api/umount", get(unmount::<R>))
        .route("/api/du", get(disk_usage::<R>))
        .route(
            "/api/available-snapshots-local",
            get(available_local_snapshots::<R>),
        )
        .route("/api/available-snapshots", get(available_snapshots::<R>))
        .route("/api/mysql-status", get(service_status::<R>))
        .route("/api/mysql-stop", get(service_stop::<R>))
        .route("/api/mysql-start", get(service_start::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.token.clone(),
            require_token,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/api/hostname", get(hostname::<R>))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn require_token(
    State(token): State<ProcessToken>,
    Query(query): Query<TokenQuery>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match query.token {
        Some(candidate) if token.verify(&candidate) => Ok(next.run(request).await),
        _ => Err(ApiError::InvalidToken),
    }
}

// ===================================================================
// Handlers
// ===================================================================

/// Liveness probe for load balancers.
async fn health() -> StatusCode {
    StatusCode::OK
}

async fn hostname<R: CommandRunner>(State(state): SharedState<R>) -> ApiResult<String> {
    respond(state.agent.hostname())
}

async fn list_volumes<R: CommandRunner>(
    State(state): SharedState<R>,
) -> ApiResult<Vec<LogicalVolume>> {
    respond(state.agent.logical_volumes("", "").await)
}

async fn list_volumes_matching<R: CommandRunner>(
    State(state): SharedState<R>,
    Path(pattern): Path<String>,
) -> ApiResult<Vec<LogicalVolume>> {
    respond(state.agent.logical_volumes("", &pattern).await)
}

async fn list_snapshot_volumes<R: CommandRunner>(
    State(state): SharedState<R>,
) -> ApiResult<Vec<LogicalVolume>> {
    respond(state.agent.snapshot_volumes().await)
}

async fn logical_volume<R: CommandRunner>(
    State(state): SharedState<R>,
    Query(query): Query<VolumeQuery>,
) -> ApiResult<Vec<LogicalVolume>> {
    respond(state.agent.logical_volumes(&query.lv, "").await)
}

async fn logical_volume_named<R: CommandRunner>(
    State(state): SharedState<R>,
    Path(lv): Path<String>,
) -> ApiResult<Vec<LogicalVolume>> {
    respond(state.agent.logical_volumes(&lv, "").await)
}

async fn get_mount<R: CommandRunner>(State(state): SharedState<R>) -> ApiResult<Mount> {
    respond(state.agent.snapshot_mount().await)
}

async fn mount_volume<R: CommandRunner>(
    State(state): SharedState<R>,
    Query(query): Query<VolumeQuery>,
) -> ApiResult<Mount> {
    respond(state.agent.mount_snapshot(&query.lv).await)
}

async fn mount_volume_named<R: CommandRunner>(
    State(state): SharedState<R>,
    Path(lv): Path<String>,
) -> ApiResult<Mount> {
    respond(state.agent.mount_snapshot(&lv).await)
}

async fn unmount<R: CommandRunner>(State(state): SharedState<R>) -> ApiResult<Mount> {
    respond(state.agent.unmount_snapshot().await)
}

async fn disk_usage<R: CommandRunner>(
    State(state): SharedState<R>,
    Query(query): Query<PathQuery>,
) -> ApiResult<u64> {
    respond(state.agent.disk_usage(&query.path).await)
}

async fn available_local_snapshots<R: CommandRunner>(
    State(state): SharedState<R>,
) -> ApiResult<Vec<String>> {
    respond(state.agent.available_snapshot_hosts(true).await)
}

async fn available_snapshots<R: CommandRunner>(
    State(state): SharedState<R>,
) -> ApiResult<Vec<String>> {
    respond(state.agent.available_snapshot_hosts(false).await)
}

async fn service_status<R: CommandRunner>(State(state): SharedState<R>) -> ApiResult<bool> {
    respond(state.agent.service_running().await)
}

async fn service_stop<R: CommandRunner>(State(state): SharedState<R>) -> ApiResult<bool> {
    respond(state.agent.service_stop().await.map(|()| true))
}

async fn service_start<R: CommandRunner>(State(state): SharedState<R>) -> ApiResult<bool> {
    respond(state.agent.service_start().await.map(|()| true))
}

// ===================================================================
// Tests
// ===================================================================
