use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::{
    dto::{BulkImportRequest, BulkImportResponse, CreateEntryRequest, SearchQuery},
    parser::parse_bulk,
    repo_types::Entry,
    services::{bulk_message, filter_entries, new_entry_from_request},
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/data", get(list_entries))
        .route("/data/search", get(search_entries))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/data", post(create_entry))
        .route("/data/bulk", post(bulk_import))
}

#[instrument(skip_all)]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Json<Vec<Entry>> {
    Json(state.store.load_all().await)
}

#[instrument(skip_all)]
pub async fn search_entries(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Entry>>> {
    let Query(query) = query?;
    let entries = filter_entries(state.store.load_all().await, &query);
    Ok(Json(entries))
}

#[instrument(skip_all)]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Entry>)> {
    let Json(payload) = payload?;
    let new_entry = new_entry_from_request(payload)?;

    let mut created = state.store.append(vec![new_entry]).await?;
    let entry = created
        .pop()
        .ok_or_else(|| anyhow::anyhow!("store returned no entry for single insert"))?;

    info!(id = entry.id, code = %entry.code, user = %user.username, "entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip_all)]
pub async fn bulk_import(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<BulkImportRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BulkImportResponse>)> {
    let Json(payload) = payload?;
    let Some(input) = payload.multi_line_input.filter(|s| !s.is_empty()) else {
        return Err(ApiError::Validation("Multi-line input is required".into()));
    };

    let parsed = parse_bulk(&input);
    let entries = state.store.append(parsed).await?;

    info!(added = entries.len(), user = %user.username, "bulk import finished");
    Ok((
        StatusCode::CREATED,
        Json(BulkImportResponse {
            message: bulk_message(entries.len()),
            entries,
        }),
    ))
}
