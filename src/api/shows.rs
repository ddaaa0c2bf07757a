use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DeletedDto, ShowDto};
use crate::auth::Principal;
use crate::models::{ShowInput, ShowPatch};
use crate::validation::{validate_show, validate_show_patch};

/// GET /api/tv/shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ShowDto>>>, ApiError> {
    let shows = state.store.list_shows().await?;
    Ok(Json(ApiResponse::success(
        shows.into_iter().map(ShowDto::from).collect(),
    )))
}

/// GET /api/tv/shows/{id}
pub async fn get_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ShowDto>>, ApiError> {
    let show = state
        .store
        .get_show(id)
        .await?
        .ok_or_else(|| ApiError::not_found("TVShow", id))?;

    Ok(Json(ApiResponse::success(show.into())))
}

/// POST /api/tv/shows (admin)
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<ShowInput>,
) -> Result<(StatusCode, Json<ApiResponse<ShowDto>>), ApiError> {
    principal.require_admin()?;
    validate_show(&payload)?;

    let show = state.store.create_show(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(show.into())),
    ))
}

/// PUT /api/tv/shows/{id} (admin)
/// Partial update: only fields present in the payload change.
pub async fn update_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
    Json(payload): Json<ShowPatch>,
) -> Result<Json<ApiResponse<ShowDto>>, ApiError> {
    state
        .store
        .get_show(id)
        .await?
        .ok_or_else(|| ApiError::not_found("TVShow", id))?;
    principal.require_admin()?;
    validate_show_patch(&payload)?;

    let show = state
        .store
        .update_show(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("TVShow", id))?;

    Ok(Json(ApiResponse::success(show.into())))
}

/// DELETE /api/tv/shows/{id} (admin)
/// Cascades through seasons, episodes, screen times and crew links.
pub async fn delete_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    state
        .store
        .get_show(id)
        .await?
        .ok_or_else(|| ApiError::not_found("TVShow", id))?;
    principal.require_admin()?;

    state.store.delete_show(id).await?;

    Ok(Json(ApiResponse::success(DeletedDto { id })))
}
