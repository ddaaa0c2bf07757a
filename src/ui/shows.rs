use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{UiError, blank_to_none, flash, render, require_admin, require_login, take_flash};
use crate::api::AppState;
use crate::models::{ShowInput, ShowPatch};
use crate::validation::{validate_show, validate_show_patch};

#[derive(Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// GET /shows
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, UiError> {
    let principal = require_login(&session).await?;
    let shows = state.store.list_shows().await?;

    let mut rows = String::new();
    for show in &shows {
        let actions = if principal.is_privileged() {
            format!(
                r#"<a href="/shows/{id}/edit">Edit</a> {delete}"#,
                id = show.id,
                delete = render::delete_button(&format!("/shows/{}/delete", show.id)),
            )
        } else {
            String::new()
        };
        rows.push_str(&format!(
            "<tr><td>{id}</td><td><a href=\"/shows/{id}/seasons\">{title}</a></td><td>{description}</td><td>{actions}</td></tr>\n",
            id = show.id,
            title = render::esc(&show.title),
            description = render::opt(&show.description),
        ));
    }

    let add_link = if principal.is_privileged() {
        r#"<p><a href="/shows/add">Add a show</a></p>"#
    } else {
        ""
    };

    let flash_message = take_flash(&session).await?;
    let body = format!(
        "{add_link}<table><tr><th>Id</th><th>Title</th><th>Description</th><th></th></tr>\n{rows}</table>"
    );

    Ok(Html(render::page("Shows", true, flash_message.as_deref(), &body)).into_response())
}

/// GET /shows/add
pub async fn add_form(session: Session) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let flash_message = take_flash(&session).await?;
    let body = r#"<form method="post" action="/shows/add">
<label>Title <input name="title" required></label>
<label>Description <input name="description"></label>
<button type="submit">Create</button>
</form>
<p><a href="/shows">Back to shows</a></p>"#;

    Ok(Html(render::page("Add show", true, flash_message.as_deref(), body)).into_response())
}

/// POST /shows/add
pub async fn add(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<ShowForm>,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let input = ShowInput {
        title: form.title,
        description: blank_to_none(form.description),
    };

    if let Err(errors) = validate_show(&input) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to("/shows/add").into_response());
    }

    let show = state.store.create_show(&input).await?;
    flash(&session, format!("Created show \"{}\"", show.title)).await?;

    Ok(Redirect::to("/shows").into_response())
}

/// GET /shows/{id}/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let Some(show) = state.store.get_show(id).await? else {
        flash(&session, "Show not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };

    let flash_message = take_flash(&session).await?;
    let body = format!(
        r#"<form method="post" action="/shows/{id}/edit">
<label>Title <input name="title" value="{title}" required></label>
<label>Description <input name="description" value="{description}"></label>
<button type="submit">Save</button>
</form>
<p><a href="/shows">Back to shows</a></p>"#,
        id = show.id,
        title = render::attr(&show.title),
        description = render::opt(&show.description),
    );

    Ok(Html(render::page("Edit show", true, flash_message.as_deref(), &body)).into_response())
}

/// POST /shows/{id}/edit
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
    Form(form): Form<ShowForm>,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    // The form always submits every field, so a blank is an explicit clear
    let patch = ShowPatch {
        title: Some(form.title),
        description: Some(form.description),
    };

    if let Err(errors) = validate_show_patch(&patch) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to(&format!("/shows/{id}/edit")).into_response());
    }

    match state.store.update_show(id, &patch).await? {
        Some(show) => {
            flash(&session, format!("Updated show \"{}\"", show.title)).await?;
        }
        None => {
            flash(&session, "Show not found").await?;
        }
    }

    Ok(Redirect::to("/shows").into_response())
}

/// POST /shows/{id}/delete
/// Cascades through seasons, episodes, screen times, and crew links.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    if state.store.delete_show(id).await? {
        flash(&session, "Show deleted").await?;
    } else {
        flash(&session, "Show not found").await?;
    }

    Ok(Redirect::to("/shows").into_response())
}
