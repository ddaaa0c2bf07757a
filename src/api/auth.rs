use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{HeaderMap, StatusCode, request::Parts},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, RegisteredDto, TokenDto, UserProfileDto};
use crate::auth::{self, Principal, Role};
use crate::models::RegistrationInput;
use crate::validation::validate_registration;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    Some(token.trim().to_string())
}

/// Token-authenticated principal for API handlers. The role claim embedded
/// at login is trusted as-is; it is never re-read from the database here.
impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let claims = auth::validate_token(&state.config.security.token_secret, &token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(claims.principal())
    }
}

/// POST /api/auth/register
/// Unauthenticated; always creates a plain user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegistrationInput>,
) -> Result<(StatusCode, Json<ApiResponse<RegisteredDto>>), ApiError> {
    validate_registration(&payload)?;

    let user = match state
        .store
        .create_user(&payload, Role::User, &state.config.security)
        .await
    {
        Ok(user) => user,
        // The register contract reports a taken username as a field error,
        // not a 409, matching the uniqueness race too.
        Err(err) => {
            return match ApiError::from(err) {
                ApiError::Conflict(_) => {
                    Err(ApiError::validation("username", "username already exists"))
                }
                other => Err(other),
            };
        }
    };

    tracing::info!("Registered user {} (id {})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RegisteredDto { id: user.id })),
    ))
}

/// POST /api/auth/login
/// Verify credentials and issue a fresh bearer token carrying id + role.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenDto>>, ApiError> {
    let user = state
        .store
        .verify_credentials(&payload.username, &payload.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("bad credentials"))?;

    let access_token = auth::issue_token(
        &state.config.security.token_secret,
        user.id,
        user.role,
        state.config.security.token_ttl_minutes,
    )?;

    Ok(Json(ApiResponse::success(TokenDto { access_token })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<ApiResponse<UserProfileDto>>, ApiError> {
    let user = state
        .store
        .get_user_by_id(principal.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", principal.user_id))?;

    Ok(Json(ApiResponse::success(user.into())))
}
