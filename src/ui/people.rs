use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{UiError, blank_to_none, flash, render, require_admin, require_login, take_flash};
use crate::api::AppState;
use crate::models::{ActorInput, CrewInput};
use crate::validation::{validate_actor, validate_crew};

#[derive(Deserialize)]
pub struct ActorForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct CrewForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub person_definition: String,
}

/// GET /actors
pub async fn actors(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, UiError> {
    let principal = require_login(&session).await?;
    let actors = state.store.list_actors().await?;

    let mut rows = String::new();
    for actor in &actors {
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{first}</td><td>{last}</td></tr>\n",
            id = actor.id,
            first = render::esc(&actor.first_name),
            last = render::opt(&actor.last_name),
        ));
    }

    let create_form = if principal.is_privileged() {
        r#"<h2>Add actor</h2>
<form method="post" action="/actors">
<label>First name <input name="first_name" required></label>
<label>Last name <input name="last_name"></label>
<button type="submit">Create</button>
</form>"#
    } else {
        ""
    };

    let flash_message = take_flash(&session).await?;
    let body = format!(
        "<table><tr><th>Id</th><th>First name</th><th>Last name</th></tr>\n{rows}</table>\n{create_form}"
    );

    Ok(Html(render::page("Actors", true, flash_message.as_deref(), &body)).into_response())
}

/// POST /actors
pub async fn add_actor(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<ActorForm>,
) -> Result<Response, UiError> {
    require_admin(&session, "/actors").await?;

    let input = ActorInput {
        first_name: form.first_name,
        last_name: blank_to_none(form.last_name),
    };

    if let Err(errors) = validate_actor(&input) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to("/actors").into_response());
    }

    let actor = state.store.create_actor(&input).await?;
    flash(&session, format!("Added actor {}", actor.first_name)).await?;

    Ok(Redirect::to("/actors").into_response())
}

/// GET /crew
pub async fn crew(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, UiError> {
    let principal = require_login(&session).await?;
    let crews = state.store.list_crews().await?;

    let mut rows = String::new();
    for member in &crews {
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{first}</td><td>{last}</td><td>{definition}</td></tr>\n",
            id = member.id,
            first = render::esc(&member.first_name),
            last = render::opt(&member.last_name),
            definition = render::opt(&member.person_definition),
        ));
    }

    let create_form = if principal.is_privileged() {
        r#"<h2>Add crew member</h2>
<form method="post" action="/crew">
<label>First name <input name="first_name" required></label>
<label>Last name <input name="last_name"></label>
<label>Role <input name="person_definition" placeholder="e.g. Director"></label>
<button type="submit">Create</button>
</form>"#
    } else {
        ""
    };

    let flash_message = take_flash(&session).await?;
    let body = format!(
        "<table><tr><th>Id</th><th>First name</th><th>Last name</th><th>Role</th></tr>\n{rows}</table>\n{create_form}"
    );

    Ok(Html(render::page("Crew", true, flash_message.as_deref(), &body)).into_response())
}

/// POST /crew
pub async fn add_crew(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<CrewForm>,
) -> Result<Response, UiError> {
    require_admin(&session, "/crew").await?;

    let input = CrewInput {
        first_name: form.first_name,
        last_name: blank_to_none(form.last_name),
        person_definition: blank_to_none(form.person_definition),
    };

    if let Err(errors) = validate_crew(&input) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to("/crew").into_response());
    }

    let member = state.store.create_crew(&input).await?;
    flash(&session, format!("Added crew member {}", member.first_name)).await?;

    Ok(Redirect::to("/crew").into_response())
}
