use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::db::Store;

pub mod auth;
mod episodes;
mod error;
mod people;
mod seasons;
mod shows;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState { config, store }))
}

/// The JSON API. Stateless: every identity-dependent route authenticates
/// via the bearer token, never via the UI's session cookie.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/system/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/tv/shows", get(shows::list_shows))
        .route("/tv/shows", post(shows::create_show))
        .route("/tv/shows/{id}", get(shows::get_show))
        .route("/tv/shows/{id}", put(shows::update_show))
        .route("/tv/shows/{id}", delete(shows::delete_show))
        .route("/tv/shows/{id}/seasons", get(seasons::list_seasons_for_show))
        .route("/tv/seasons", get(seasons::list_seasons))
        .route("/tv/seasons", post(seasons::create_season))
        .route("/tv/seasons/{id}", get(seasons::get_season))
        .route("/tv/seasons/{id}", put(seasons::update_season))
        .route("/tv/seasons/{id}", delete(seasons::delete_season))
        .route(
            "/tv/seasons/{id}/episodes",
            get(episodes::list_episodes_for_season),
        )
        .route("/tv/episodes", get(episodes::list_episodes))
        .route("/tv/episodes", post(episodes::create_episode))
        .route("/tv/episodes/{id}", get(episodes::get_episode))
        .route("/tv/episodes/{id}", put(episodes::update_episode))
        .route("/tv/episodes/{id}", delete(episodes::delete_episode))
        .route("/tv/episodes/{id}/actors", put(episodes::set_episode_actors))
        .route("/tv/episodes/{id}/crew", put(episodes::set_episode_crew))
        .route("/people/actors", get(people::list_actors))
        .route("/people/actors", post(people::create_actor))
        .route("/people/actors/{id}", get(people::get_actor))
        .route("/people/actors/{id}", delete(people::delete_actor))
        .route(
            "/people/actors/{id}/screentimes",
            get(people::list_actor_screen_times),
        )
        .route("/people/crews", get(people::list_crews))
        .route("/people/crews", post(people::create_crew))
        .route("/people/crews/{id}", get(people::get_crew))
        .route("/people/crews/{id}", delete(people::delete_crew))
        .route("/people/screentimes", post(people::create_screen_time))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
}

/// GET /api/system/health
async fn health(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<axum::Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.store.ping().await?;
    Ok(axum::Json(ApiResponse::success(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))))
}
