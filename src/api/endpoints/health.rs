//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
    pub version: String,
    pub uptime_secs: u64,
}

/// `GET /api/health`: connection check for PDA clients.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let database = {
        let conn = ctx.core.db()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)).is_ok()
    };

    Ok(Json(HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        database,
        version: crate::config::APP_VERSION.to_string(),
        uptime_secs: ctx.core.uptime_secs(),
    }))
}
