use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{UiError, blank_to_none, flash, is_conflict, render, session_principal, take_flash};
use crate::api::AppState;
use crate::auth::Role;
use crate::models::RegistrationInput;
use crate::validation::validate_registration;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// GET /
pub async fn root(session: Session) -> Result<Response, UiError> {
    let target = if session_principal(&session).await?.is_some() {
        "/dashboard"
    } else {
        "/login"
    };
    Ok(Redirect::to(target).into_response())
}

/// GET /login
pub async fn login_form(session: Session) -> Result<Response, UiError> {
    if session_principal(&session).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let flash_message = take_flash(&session).await?;
    let body = r#"<form method="post" action="/login">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/register">Register</a>.</p>"#;

    Ok(Html(render::page("Log in", false, flash_message.as_deref(), body)).into_response())
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, UiError> {
    let Some(user) = state
        .store
        .verify_credentials(&form.username, &form.password)
        .await?
    else {
        flash(&session, "Invalid username or password").await?;
        return Ok(Redirect::to("/login").into_response());
    };

    super::log_in_session(&session, user.id, user.role).await?;
    flash(&session, format!("Welcome back, {}", user.username)).await?;

    Ok(Redirect::to("/dashboard").into_response())
}

/// GET /logout
pub async fn logout(session: Session) -> Result<Response, UiError> {
    session.flush().await?;
    flash(&session, "You have been logged out").await?;
    Ok(Redirect::to("/login").into_response())
}

/// GET /register
pub async fn register_form(session: Session) -> Result<Response, UiError> {
    if session_principal(&session).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let flash_message = take_flash(&session).await?;
    let body = r#"<form method="post" action="/register">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<label>Email (optional) <input name="email" type="email"></label>
<button type="submit">Register</button>
</form>
<p>Already have an account? <a href="/login">Log in</a>.</p>"#;

    Ok(Html(render::page("Register", false, flash_message.as_deref(), body)).into_response())
}

/// POST /register
/// Always creates a plain user, same as the API contract.
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, UiError> {
    let input = RegistrationInput {
        username: form.username,
        password: form.password,
        email: blank_to_none(form.email),
    };

    if let Err(errors) = validate_registration(&input) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to("/register").into_response());
    }

    match state
        .store
        .create_user(&input, Role::User, &state.config.security)
        .await
    {
        Ok(user) => {
            tracing::info!("Registered user {} (id {}) via UI", user.username, user.id);
            flash(&session, "Account created, please log in").await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(err) if is_conflict(&err) => {
            flash(&session, "That username is already taken").await?;
            Ok(Redirect::to("/register").into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, UiError> {
    let principal = super::require_login(&session).await?;

    let Some(user) = state.store.get_user_by_id(principal.user_id).await? else {
        // Account vanished under the session.
        session.flush().await?;
        flash(&session, "Please log in first").await?;
        return Ok(Redirect::to("/login").into_response());
    };

    let show_count = state.store.list_shows().await?.len();
    let actor_count = state.store.list_actors().await?.len();
    let crew_count = state.store.list_crews().await?.len();

    let flash_message = take_flash(&session).await?;
    let body = format!(
        r#"<p>Signed in as <strong>{username}</strong> ({role}).</p>
<ul>
<li><a href="/shows">{show_count} shows</a></li>
<li><a href="/actors">{actor_count} actors</a></li>
<li><a href="/crew">{crew_count} crew members</a></li>
</ul>"#,
        username = render::esc(&user.username),
        role = user.role.as_str(),
    );

    Ok(Html(render::page("Dashboard", true, flash_message.as_deref(), &body)).into_response())
}
