use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DeletedDto, SeasonDto};
use crate::auth::Principal;
use crate::models::{SeasonInput, SeasonPatch};
use crate::validation::{validate_season, validate_season_patch};

/// GET /api/tv/seasons
pub async fn list_seasons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SeasonDto>>>, ApiError> {
    let seasons = state.store.list_seasons().await?;
    Ok(Json(ApiResponse::success(
        seasons.into_iter().map(SeasonDto::from).collect(),
    )))
}

/// GET /api/tv/shows/{id}/seasons
pub async fn list_seasons_for_show(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<SeasonDto>>>, ApiError> {
    state
        .store
        .get_show(show_id)
        .await?
        .ok_or_else(|| ApiError::not_found("TVShow", show_id))?;

    let seasons = state.store.list_seasons_for_show(show_id).await?;
    Ok(Json(ApiResponse::success(
        seasons.into_iter().map(SeasonDto::from).collect(),
    )))
}

/// GET /api/tv/seasons/{id}
pub async fn get_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SeasonDto>>, ApiError> {
    let season = state
        .store
        .get_season(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Season", id))?;

    Ok(Json(ApiResponse::success(season.into())))
}

/// POST /api/tv/seasons (admin)
/// Duplicate (show, season_number) pairs come back as a conflict.
pub async fn create_season(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<SeasonInput>,
) -> Result<(StatusCode, Json<ApiResponse<SeasonDto>>), ApiError> {
    principal.require_admin()?;
    validate_season(&payload)?;

    state
        .store
        .get_show(payload.tvshow_id)
        .await?
        .ok_or_else(|| ApiError::not_found("TVShow", payload.tvshow_id))?;

    let season = state.store.create_season(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(season.into())),
    ))
}

/// PUT /api/tv/seasons/{id} (admin)
pub async fn update_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
    Json(payload): Json<SeasonPatch>,
) -> Result<Json<ApiResponse<SeasonDto>>, ApiError> {
    state
        .store
        .get_season(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Season", id))?;
    principal.require_admin()?;
    validate_season_patch(&payload)?;

    let season = state
        .store
        .update_season(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Season", id))?;

    Ok(Json(ApiResponse::success(season.into())))
}

/// DELETE /api/tv/seasons/{id} (admin)
pub async fn delete_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    state
        .store
        .get_season(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Season", id))?;
    principal.require_admin()?;

    state.store.delete_season(id).await?;

    Ok(Json(ApiResponse::success(DeletedDto { id })))
}
