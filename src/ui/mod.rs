//! Server-rendered HTML surface. Identity lives in a server-side session
//! cookie rather than a bearer token; every mutation ends in a redirect with
//! a transient flash message, never a raw error payload.

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use std::sync::Arc;
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::api::AppState;
use crate::auth::{Principal, Role};

mod auth;
mod episodes;
mod people;
mod render;
mod seasons;
mod shows;

const USER_ID_KEY: &str = "user_id";
const ROLE_KEY: &str = "role";
const FLASH_KEY: &str = "flash";

pub fn router(state: Arc<AppState>) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config.server.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            state.config.server.session_ttl_minutes,
        )));

    Router::new()
        .route("/", get(auth::root))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/dashboard", get(auth::dashboard))
        .route("/shows", get(shows::list))
        .route("/shows/add", get(shows::add_form).post(shows::add))
        .route("/shows/{id}/edit", get(shows::edit_form).post(shows::edit))
        .route("/shows/{id}/delete", post(shows::remove))
        .route("/shows/{id}/seasons", get(seasons::list))
        .route(
            "/shows/{id}/seasons/add",
            get(seasons::add_form).post(seasons::add),
        )
        .route(
            "/seasons/{id}/edit",
            get(seasons::edit_form).post(seasons::edit),
        )
        .route("/seasons/{id}/delete", post(seasons::remove))
        .route(
            "/seasons/{id}/episodes",
            get(episodes::list).post(episodes::add),
        )
        .route(
            "/episodes/{id}/edit",
            get(episodes::edit_form).post(episodes::edit),
        )
        .route("/episodes/{id}/delete", post(episodes::remove))
        .route("/actors", get(people::actors).post(people::add_actor))
        .route("/crew", get(people::crew).post(people::add_crew))
        .layer(session_layer)
        .with_state(state)
}

/// UI-side failure: either a deliberate bounce (flash already queued) or an
/// internal error rendered as a plain 500 page.
pub enum UiError {
    Redirect(String),
    Internal(anyhow::Error),
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(to) => Redirect::to(&to).into_response(),
            Self::Internal(err) => {
                tracing::error!("UI error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(render::error_page())).into_response()
            }
        }
    }
}

impl From<anyhow::Error> for UiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<tower_sessions::session::Error> for UiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(err.into())
    }
}

pub(crate) async fn flash(session: &Session, message: impl Into<String>) -> Result<(), UiError> {
    session.insert(FLASH_KEY, message.into()).await?;
    Ok(())
}

pub(crate) async fn take_flash(session: &Session) -> Result<Option<String>, UiError> {
    Ok(session.remove::<String>(FLASH_KEY).await?)
}

pub(crate) async fn session_principal(session: &Session) -> Result<Option<Principal>, UiError> {
    let user_id: Option<i32> = session.get(USER_ID_KEY).await?;
    let role: Option<String> = session.get(ROLE_KEY).await?;

    Ok(match (user_id, role) {
        (Some(user_id), Some(role)) => Some(Principal {
            user_id,
            role: Role::parse(&role),
        }),
        _ => None,
    })
}

pub(crate) async fn log_in_session(session: &Session, user_id: i32, role: Role) -> Result<(), UiError> {
    // Fresh id on privilege change, so a pre-login cookie is worthless.
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    session.insert(ROLE_KEY, role.as_str().to_string()).await?;
    Ok(())
}

/// Bounce to the login page when the session carries no identity.
pub(crate) async fn require_login(session: &Session) -> Result<Principal, UiError> {
    match session_principal(session).await? {
        Some(principal) => Ok(principal),
        None => {
            flash(session, "Please log in first").await?;
            Err(UiError::Redirect("/login".to_string()))
        }
    }
}

/// Admin gate for mutations; bounces back to `back` with a flash otherwise.
pub(crate) async fn require_admin(session: &Session, back: &str) -> Result<Principal, UiError> {
    let principal = require_login(session).await?;
    if principal.is_privileged() {
        Ok(principal)
    } else {
        flash(session, "Admin privileges required").await?;
        Err(UiError::Redirect(back.to_string()))
    }
}

pub(crate) fn is_conflict(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>()
        .and_then(sea_orm::DbErr::sql_err)
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}

/// A foreign key failed: a submitted id refers to a record that no longer
/// exists.
pub(crate) fn is_missing_reference(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>()
        .and_then(sea_orm::DbErr::sql_err)
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::ForeignKeyConstraintViolation(_)))
}

/// HTML forms submit missing optional fields as empty strings.
pub(crate) fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
