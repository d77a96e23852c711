//! API request handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::SpamError;
use crate::spam::{SpamLogEntry, SpamLogStats, SpamLogStore, SpamService, SpamVerdict};

const DEFAULT_LOG_LIMIT: i64 = 100;
const MAX_LOG_LIMIT: i64 = 1000;

/// Shared application state
pub struct AppState {
    pub service: SpamService,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

impl IntoResponse for SpamError {
    fn into_response(self) -> Response {
        let status = match self {
            SpamError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(ApiError::new(&self.to_string()))).into_response()
    }
}

/// Spam check request body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckSpamRequest {
    pub subject: String,
    pub body: String,
}

/// Query parameters for the log listing
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub limit: Option<i64>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub scorer: String,
}

/// Log clearing response
#[derive(Debug, Serialize)]
pub struct ClearLogsResponse {
    pub deleted: u64,
}

fn log_disabled() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ApiError::new("Classification log is disabled")),
    )
        .into_response()
}

fn log_store(state: &AppState) -> Option<&Arc<SpamLogStore>> {
    state.service.log_store()
}

/// GET /health - Liveness check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        scorer: state.service.scorer_kind().to_string(),
    })
}

/// POST /api/check_spam - Classify an email
pub async fn check_spam(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckSpamRequest>, JsonRejection>,
) -> Result<Json<SpamVerdict>, Response> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected spam check request: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(&rejection.body_text())),
        )
            .into_response()
    })?;

    let verdict = state
        .service
        .check(&req.subject, &req.body)
        .map_err(IntoResponse::into_response)?;

    info!(
        "API spam check: spam={} score={} indicators={}",
        verdict.is_spam,
        verdict.score,
        verdict.indicators.len()
    );

    Ok(Json(verdict))
}

/// GET /api/logs - Most recent classifications
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LogQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            warn!("Rejected log query: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(&rejection.body_text())),
            )
                .into_response();
        }
    };
    let Some(store) = log_store(&state) else {
        return log_disabled();
    };
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LOG_LIMIT)
        .clamp(1, MAX_LOG_LIMIT);

    match store.recent(limit).await {
        Ok(logs) => Json::<Vec<SpamLogEntry>>(logs).into_response(),
        Err(e) => e.into_response(),
    }
}

/// DELETE /api/logs - Clear the classification log
pub async fn clear_logs(State(state): State<Arc<AppState>>) -> Response {
    let Some(store) = log_store(&state) else {
        return log_disabled();
    };

    match store.clear().await {
        Ok(deleted) => {
            info!("Cleared {} classification log entries", deleted);
            Json(ClearLogsResponse { deleted }).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /api/stats - Spam/ham counts over the log
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Response {
    let Some(store) = log_store(&state) else {
        return log_disabled();
    };

    match store.stats().await {
        Ok(stats) => Json::<SpamLogStats>(stats).into_response(),
        Err(e) => e.into_response(),
    }
}
