use anyhow::Context;
use axum::Json;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, OffsetDateTime};

use crate::error::ApiResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// UTC, millisecond precision: `2024-01-01T12:00:00.000Z`.
    pub timestamp: String,
}

fn iso_millis(ts: OffsetDateTime) -> Result<String, time::error::Format> {
    ts.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))
}

/// GET /api/health
pub async fn health_handler() -> ApiResult<Json<HealthResponse>> {
    let timestamp = iso_millis(OffsetDateTime::now_utc()).context("format health timestamp")?;
    Ok(Json(HealthResponse {
        status: "OK".into(),
        message: "Server is running".into(),
        timestamp,
    }))
}
