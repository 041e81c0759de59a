//! Table endpoints.
//!
//! `GET  /api/crontab`         → `[Entry, ...]`
//! `POST /api/crontab`         ← `[Entry, ...]` or `{"entries": [...], "baseline": [...]}`
//!                             → confirmed `[Entry, ...]` as re-read from the store
//! `GET  /api/crontab/skipped` → `["<verbatim line>", ...]`
//!
//! Error: `{"error": "...", "code": "..."}`

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use cronpad_core::CronpadError;
use cronpad_table::{Entry, SaveRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: &'static str,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn reject(err: CronpadError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        CronpadError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        CronpadError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ApiError {
            error: err.to_string(),
            code: err.code(),
        }),
    )
}

/// GET /api/crontab: the current table as entries.
pub async fn fetch_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Entry>> {
    match state.tables.fetch().await {
        Ok(outcome) => Ok(Json(outcome.entries)),
        Err(e) => {
            warn!(error = %e, "GET /api/crontab failed");
            Err(reject(e.into()))
        }
    }
}

/// POST /api/crontab: replace the entry set and return the confirmed table.
///
/// The body is decoded by hand so a bad payload gets the same error shape
/// as every other failure, and is rejected before the store is touched.
pub async fn save_handler(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Vec<Entry>> {
    let request = SaveRequest::from_json(&body).map_err(|e| {
        warn!(error = %e, "POST /api/crontab rejected");
        reject(CronpadError::MalformedRequest(e.to_string()))
    })?;

    match state.tables.save(&request).await {
        Ok(outcome) => Ok(Json(outcome.entries)),
        Err(e) => {
            warn!(error = %e, "POST /api/crontab failed");
            Err(reject(e.into()))
        }
    }
}

/// GET /api/crontab/skipped: lines present in the table but not shown.
pub async fn skipped_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<String>> {
    match state.tables.fetch().await {
        Ok(outcome) => Ok(Json(outcome.skipped)),
        Err(e) => {
            warn!(error = %e, "GET /api/crontab/skipped failed");
            Err(reject(e.into()))
        }
    }
}
