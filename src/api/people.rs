use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ActorDto, ApiError, ApiResponse, AppState, CrewDto, DeletedDto, ScreenTimeDto};
use crate::auth::Principal;
use crate::models::{ActorInput, CrewInput, ScreenTimeInput};
use crate::validation::{validate_actor, validate_crew, validate_screen_time};

/// GET /api/people/actors
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ActorDto>>>, ApiError> {
    let actors = state.store.list_actors().await?;
    Ok(Json(ApiResponse::success(
        actors.into_iter().map(ActorDto::from).collect(),
    )))
}

/// GET /api/people/actors/{id}
pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ActorDto>>, ApiError> {
    let actor = state
        .store
        .get_actor(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Actor", id))?;

    Ok(Json(ApiResponse::success(actor.into())))
}

/// POST /api/people/actors (admin)
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<ActorInput>,
) -> Result<(StatusCode, Json<ApiResponse<ActorDto>>), ApiError> {
    principal.require_admin()?;
    validate_actor(&payload)?;

    let actor = state.store.create_actor(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(actor.into())),
    ))
}

/// DELETE /api/people/actors/{id} (admin)
/// Removes the actor's screen times and episode links; episodes stay.
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    state
        .store
        .get_actor(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Actor", id))?;
    principal.require_admin()?;

    state.store.delete_actor(id).await?;

    Ok(Json(ApiResponse::success(DeletedDto { id })))
}

/// GET /api/people/actors/{id}/screentimes
pub async fn list_actor_screen_times(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ScreenTimeDto>>>, ApiError> {
    state
        .store
        .get_actor(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Actor", id))?;

    let screen_times = state.store.list_screen_times_for_actor(id).await?;
    Ok(Json(ApiResponse::success(
        screen_times.into_iter().map(ScreenTimeDto::from).collect(),
    )))
}

/// GET /api/people/crews
pub async fn list_crews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CrewDto>>>, ApiError> {
    let crews = state.store.list_crews().await?;
    Ok(Json(ApiResponse::success(
        crews.into_iter().map(CrewDto::from).collect(),
    )))
}

/// GET /api/people/crews/{id}
pub async fn get_crew(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CrewDto>>, ApiError> {
    let crew = state
        .store
        .get_crew(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Crew", id))?;

    Ok(Json(ApiResponse::success(crew.into())))
}

/// POST /api/people/crews (admin)
pub async fn create_crew(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<CrewInput>,
) -> Result<(StatusCode, Json<ApiResponse<CrewDto>>), ApiError> {
    principal.require_admin()?;
    validate_crew(&payload)?;

    let crew = state.store.create_crew(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(crew.into())),
    ))
}

/// DELETE /api/people/crews/{id} (admin)
pub async fn delete_crew(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    state
        .store
        .get_crew(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Crew", id))?;
    principal.require_admin()?;

    state.store.delete_crew(id).await?;

    Ok(Json(ApiResponse::success(DeletedDto { id })))
}

/// POST /api/people/screentimes
/// Any authenticated principal may record screen time; this is deliberately
/// not admin-gated, unlike every other mutation.
pub async fn create_screen_time(
    State(state): State<Arc<AppState>>,
    _principal: Principal,
    Json(payload): Json<ScreenTimeInput>,
) -> Result<(StatusCode, Json<ApiResponse<ScreenTimeDto>>), ApiError> {
    validate_screen_time(&payload)?;

    state
        .store
        .get_actor(payload.actor_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Actor", payload.actor_id))?;
    state
        .store
        .get_episode(payload.episode_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", payload.episode_id))?;

    let screen_time = state.store.create_screen_time(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(screen_time.into())),
    ))
}
