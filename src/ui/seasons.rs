use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{
    UiError, blank_to_none, flash, is_conflict, render, require_admin, require_login, take_flash,
};
use crate::api::AppState;
use crate::models::{SeasonInput, SeasonPatch};
use crate::validation::{validate_season, validate_season_patch};

#[derive(Deserialize)]
pub struct SeasonForm {
    #[serde(default)]
    pub season_number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date_started: String,
    #[serde(default)]
    pub date_ended: String,
}

/// GET /shows/{id}/seasons
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    let principal = require_login(&session).await?;

    let Some(show) = state.store.get_show(show_id).await? else {
        flash(&session, "Show not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };

    let seasons = state.store.list_seasons_for_show(show_id).await?;

    let mut rows = String::new();
    for season in &seasons {
        let actions = if principal.is_privileged() {
            format!(
                r#"<a href="/seasons/{id}/edit">Edit</a> {delete}"#,
                id = season.id,
                delete = render::delete_button(&format!("/seasons/{}/delete", season.id)),
            )
        } else {
            String::new()
        };
        rows.push_str(&format!(
            "<tr><td><a href=\"/seasons/{id}/episodes\">Season {number}</a></td><td>{title}</td><td>{started}</td><td>{ended}</td><td>{actions}</td></tr>\n",
            id = season.id,
            number = season.season_number,
            title = render::opt(&season.title),
            started = render::opt(&season.date_started),
            ended = render::opt(&season.date_ended),
        ));
    }

    let add_link = if principal.is_privileged() {
        format!(r#"<p><a href="/shows/{show_id}/seasons/add">Add a season</a></p>"#)
    } else {
        String::new()
    };

    let flash_message = take_flash(&session).await?;
    let body = format!(
        "{add_link}<table><tr><th>Season</th><th>Title</th><th>Started</th><th>Ended</th><th></th></tr>\n{rows}</table>\n<p><a href=\"/shows\">Back to shows</a></p>"
    );
    let title = format!("Seasons of {}", show.title);

    Ok(Html(render::page(&title, true, flash_message.as_deref(), &body)).into_response())
}

/// GET /shows/{id}/seasons/add
pub async fn add_form(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    require_admin(&session, &format!("/shows/{show_id}/seasons")).await?;

    let Some(show) = state.store.get_show(show_id).await? else {
        flash(&session, "Show not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };

    let flash_message = take_flash(&session).await?;
    let body = format!(
        r#"<form method="post" action="/shows/{show_id}/seasons/add">
<label>Season number <input name="season_number" type="number" min="1" required></label>
<label>Title <input name="title"></label>
<label>Description <input name="description"></label>
<label>Date started <input name="date_started" type="date"></label>
<label>Date ended <input name="date_ended" type="date"></label>
<button type="submit">Create</button>
</form>
<p><a href="/shows/{show_id}/seasons">Back to seasons</a></p>"#
    );
    let title = format!("Add season to {}", show.title);

    Ok(Html(render::page(&title, true, flash_message.as_deref(), &body)).into_response())
}

/// POST /shows/{id}/seasons/add
pub async fn add(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<i32>,
    session: Session,
    Form(form): Form<SeasonForm>,
) -> Result<Response, UiError> {
    let back = format!("/shows/{show_id}/seasons");
    require_admin(&session, &back).await?;

    if state.store.get_show(show_id).await?.is_none() {
        flash(&session, "Show not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    }

    let input = SeasonInput {
        tvshow_id: show_id,
        season_number: form.season_number.trim().parse().unwrap_or(0),
        title: blank_to_none(form.title),
        description: blank_to_none(form.description),
        date_started: blank_to_none(form.date_started),
        date_ended: blank_to_none(form.date_ended),
    };

    if let Err(errors) = validate_season(&input) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to(&format!("/shows/{show_id}/seasons/add")).into_response());
    }

    match state.store.create_season(&input).await {
        Ok(season) => {
            flash(&session, format!("Created season {}", season.season_number)).await?;
            Ok(Redirect::to(&back).into_response())
        }
        Err(err) if is_conflict(&err) => {
            flash(&session, "That season number already exists for this show").await?;
            Ok(Redirect::to(&format!("/shows/{show_id}/seasons/add")).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /seasons/{id}/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let Some(season) = state.store.get_season(id).await? else {
        flash(&session, "Season not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };

    let flash_message = take_flash(&session).await?;
    let body = format!(
        r#"<form method="post" action="/seasons/{id}/edit">
<label>Season number <input name="season_number" type="number" min="1" value="{number}" required></label>
<label>Title <input name="title" value="{title}"></label>
<label>Description <input name="description" value="{description}"></label>
<label>Date started <input name="date_started" type="date" value="{started}"></label>
<label>Date ended <input name="date_ended" type="date" value="{ended}"></label>
<button type="submit">Save</button>
</form>
<p><a href="/shows/{show_id}/seasons">Back to seasons</a></p>"#,
        id = season.id,
        number = season.season_number,
        title = render::opt(&season.title),
        description = render::opt(&season.description),
        started = render::opt(&season.date_started),
        ended = render::opt(&season.date_ended),
        show_id = season.tvshow_id,
    );

    Ok(Html(render::page("Edit season", true, flash_message.as_deref(), &body)).into_response())
}

/// POST /seasons/{id}/edit
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
    Form(form): Form<SeasonForm>,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let Some(season) = state.store.get_season(id).await? else {
        flash(&session, "Season not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };
    let back = format!("/shows/{}/seasons", season.tvshow_id);

    // The form always submits every field, so a blank is an explicit clear
    let patch = SeasonPatch {
        season_number: Some(form.season_number.trim().parse().unwrap_or(0)),
        title: Some(form.title),
        description: Some(form.description),
        date_started: Some(form.date_started),
        date_ended: Some(form.date_ended),
    };

    if let Err(errors) = validate_season_patch(&patch) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to(&format!("/seasons/{id}/edit")).into_response());
    }

    match state.store.update_season(id, &patch).await {
        Ok(_) => {
            flash(&session, "Season updated").await?;
            Ok(Redirect::to(&back).into_response())
        }
        Err(err) if is_conflict(&err) => {
            flash(&session, "That season number already exists for this show").await?;
            Ok(Redirect::to(&format!("/seasons/{id}/edit")).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// POST /seasons/{id}/delete
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let Some(season) = state.store.get_season(id).await? else {
        flash(&session, "Season not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };

    state.store.delete_season(id).await?;
    flash(&session, "Season deleted").await?;

    Ok(Redirect::to(&format!("/shows/{}/seasons", season.tvshow_id)).into_response())
}
