use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DeletedDto, EpisodeDetailDto, EpisodeDto,
    MembershipRequest};
use crate::auth::Principal;
use crate::models::{EpisodeInput, EpisodePatch};
use crate::validation::{validate_episode, validate_episode_patch};

/// GET /api/tv/episodes
pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<EpisodeDto>>>, ApiError> {
    let episodes = state.store.list_episodes().await?;
    Ok(Json(ApiResponse::success(
        episodes.into_iter().map(EpisodeDto::from).collect(),
    )))
}

/// GET /api/tv/seasons/{id}/episodes
pub async fn list_episodes_for_season(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EpisodeDto>>>, ApiError> {
    state
        .store
        .get_season(season_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Season", season_id))?;

    let episodes = state.store.list_episodes_for_season(season_id).await?;
    Ok(Json(ApiResponse::success(
        episodes.into_iter().map(EpisodeDto::from).collect(),
    )))
}

/// GET /api/tv/episodes/{id}
/// Detail view includes the current actor/crew membership.
pub async fn get_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EpisodeDetailDto>>, ApiError> {
    let episode = state
        .store
        .get_episode(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", id))?;

    let actor_ids = state.store.episode_actor_ids(id).await?;
    let crew_ids = state.store.episode_crew_ids(id).await?;

    Ok(Json(ApiResponse::success(EpisodeDetailDto {
        episode: episode.into(),
        actor_ids,
        crew_ids,
    })))
}

/// POST /api/tv/episodes (admin)
pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<EpisodeInput>,
) -> Result<(StatusCode, Json<ApiResponse<EpisodeDto>>), ApiError> {
    principal.require_admin()?;
    validate_episode(&payload)?;

    state
        .store
        .get_season(payload.season_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Season", payload.season_id))?;

    let episode = state.store.create_episode(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(episode.into())),
    ))
}

/// PUT /api/tv/episodes/{id} (admin)
/// Partial update: omitted fields stay untouched.
pub async fn update_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
    Json(payload): Json<EpisodePatch>,
) -> Result<Json<ApiResponse<EpisodeDto>>, ApiError> {
    state
        .store
        .get_episode(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", id))?;
    principal.require_admin()?;
    validate_episode_patch(&payload)?;

    let episode = state
        .store
        .update_episode(id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", id))?;

    Ok(Json(ApiResponse::success(episode.into())))
}

/// DELETE /api/tv/episodes/{id} (admin)
pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    state
        .store
        .get_episode(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", id))?;
    principal.require_admin()?;

    state.store.delete_episode(id).await?;

    Ok(Json(ApiResponse::success(DeletedDto { id })))
}

/// PUT /api/tv/episodes/{id}/actors (admin)
/// Replace semantics: the submitted id set becomes the whole membership.
pub async fn set_episode_actors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
    Json(payload): Json<MembershipRequest>,
) -> Result<Json<ApiResponse<Vec<i32>>>, ApiError> {
    state
        .store
        .get_episode(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", id))?;
    principal.require_admin()?;

    for actor_id in &payload.ids {
        state
            .store
            .get_actor(*actor_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Actor", actor_id))?;
    }

    state.store.set_episode_actors(id, &payload.ids).await?;
    let actor_ids = state.store.episode_actor_ids(id).await?;

    Ok(Json(ApiResponse::success(actor_ids)))
}

/// PUT /api/tv/episodes/{id}/crew (admin)
pub async fn set_episode_crew(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    principal: Principal,
    Json(payload): Json<MembershipRequest>,
) -> Result<Json<ApiResponse<Vec<i32>>>, ApiError> {
    state
        .store
        .get_episode(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Episode", id))?;
    principal.require_admin()?;

    for crew_id in &payload.ids {
        state
            .store
            .get_crew(*crew_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Crew", crew_id))?;
    }

    state.store.set_episode_crew(id, &payload.ids).await?;
    let crew_ids = state.store.episode_crew_ids(id).await?;

    Ok(Json(ApiResponse::success(crew_ids)))
}
