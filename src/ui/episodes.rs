use axum::{
    Form,
    extract::{Path, RawForm, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tower_sessions::Session;

use super::{
    UiError, blank_to_none, flash, is_conflict, is_missing_reference, render, require_admin,
    require_login, take_flash,
};
use crate::api::AppState;
use crate::models::{EpisodeInput, EpisodePatch};
use crate::validation::{validate_episode, validate_episode_patch};

#[derive(Deserialize)]
pub struct EpisodeForm {
    #[serde(default)]
    pub episode_number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub date_published: String,
}

/// GET /seasons/{id}/episodes
/// Listing plus, for admins, an inline create form.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    let principal = require_login(&session).await?;

    let Some(season) = state.store.get_season(season_id).await? else {
        flash(&session, "Season not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };

    let episodes = state.store.list_episodes_for_season(season_id).await?;

    let mut rows = String::new();
    for episode in &episodes {
        let rating = episode
            .rating
            .map(|r| r.to_string())
            .unwrap_or_default();
        let actions = if principal.is_privileged() {
            format!(
                r#"<a href="/episodes/{id}/edit">Edit</a> {delete}"#,
                id = episode.id,
                delete = render::delete_button(&format!("/episodes/{}/delete", episode.id)),
            )
        } else {
            String::new()
        };
        rows.push_str(&format!(
            "<tr><td>{number}</td><td>{title}</td><td>{rating}</td><td>{published}</td><td>{actions}</td></tr>\n",
            number = episode.episode_number,
            title = render::esc(&episode.title),
            published = render::opt(&episode.date_published),
        ));
    }

    let create_form = if principal.is_privileged() {
        format!(
            r#"<h2>Add episode</h2>
<form method="post" action="/seasons/{season_id}/episodes">
<label>Episode number <input name="episode_number" type="number" min="1" required></label>
<label>Title <input name="title" required></label>
<label>Description <input name="description"></label>
<label>Rating (0-10) <input name="rating" type="number" min="0" max="10"></label>
<label>Date published <input name="date_published" type="date"></label>
<button type="submit">Create</button>
</form>"#
        )
    } else {
        String::new()
    };

    let flash_message = take_flash(&session).await?;
    let body = format!(
        "<table><tr><th>Episode</th><th>Title</th><th>Rating</th><th>Published</th><th></th></tr>\n{rows}</table>\n{create_form}\n<p><a href=\"/shows/{show_id}/seasons\">Back to seasons</a></p>",
        show_id = season.tvshow_id,
    );
    let title = format!("Episodes of season {}", season.season_number);

    Ok(Html(render::page(&title, true, flash_message.as_deref(), &body)).into_response())
}

/// POST /seasons/{id}/episodes
pub async fn add(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<i32>,
    session: Session,
    Form(form): Form<EpisodeForm>,
) -> Result<Response, UiError> {
    let back = format!("/seasons/{season_id}/episodes");
    require_admin(&session, &back).await?;

    if state.store.get_season(season_id).await?.is_none() {
        flash(&session, "Season not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    }

    let input = EpisodeInput {
        season_id,
        episode_number: form.episode_number.trim().parse().unwrap_or(0),
        title: form.title,
        description: blank_to_none(form.description),
        rating: blank_to_none(form.rating).map(|r| r.parse().unwrap_or(-1)),
        date_published: blank_to_none(form.date_published),
    };

    if let Err(errors) = validate_episode(&input) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to(&back).into_response());
    }

    match state.store.create_episode(&input).await {
        Ok(episode) => {
            flash(
                &session,
                format!("Created episode {}", episode.episode_number),
            )
            .await?;
        }
        Err(err) if is_conflict(&err) => {
            flash(&session, "That episode number already exists in this season").await?;
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Redirect::to(&back).into_response())
}

/// GET /episodes/{id}/edit
/// Episode fields plus actor/crew multi-selects with the current membership
/// pre-selected.
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let Some(episode) = state.store.get_episode(id).await? else {
        flash(&session, "Episode not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };

    let actors = state.store.list_actors().await?;
    let crews = state.store.list_crews().await?;
    let current_actors: HashSet<i32> = state.store.episode_actor_ids(id).await?.into_iter().collect();
    let current_crew: HashSet<i32> = state.store.episode_crew_ids(id).await?.into_iter().collect();

    let mut actor_options = String::new();
    for actor in &actors {
        let selected = if current_actors.contains(&actor.id) {
            " selected"
        } else {
            ""
        };
        let name = match &actor.last_name {
            Some(last) => format!("{} {}", actor.first_name, last),
            None => actor.first_name.clone(),
        };
        actor_options.push_str(&format!(
            "<option value=\"{id}\"{selected}>{name}</option>\n",
            id = actor.id,
            name = render::esc(&name),
        ));
    }

    let mut crew_options = String::new();
    for crew in &crews {
        let selected = if current_crew.contains(&crew.id) {
            " selected"
        } else {
            ""
        };
        let name = match &crew.last_name {
            Some(last) => format!("{} {}", crew.first_name, last),
            None => crew.first_name.clone(),
        };
        crew_options.push_str(&format!(
            "<option value=\"{id}\"{selected}>{name}</option>\n",
            id = crew.id,
            name = render::esc(&name),
        ));
    }

    let rating = episode.rating.map(|r| r.to_string()).unwrap_or_default();

    let flash_message = take_flash(&session).await?;
    let body = format!(
        r#"<form method="post" action="/episodes/{id}/edit">
<label>Episode number <input name="episode_number" type="number" min="1" value="{number}" required></label>
<label>Title <input name="title" value="{title}" required></label>
<label>Description <input name="description" value="{description}"></label>
<label>Rating (0-10) <input name="rating" type="number" min="0" max="10" value="{rating}"></label>
<label>Date published <input name="date_published" type="date" value="{published}"></label>
<label>Actors <select name="actor_ids" multiple size="8">
{actor_options}</select></label>
<label>Crew <select name="crew_ids" multiple size="8">
{crew_options}</select></label>
<button type="submit">Save</button>
</form>
<p><a href="/seasons/{season_id}/episodes">Back to episodes</a></p>"#,
        id = episode.id,
        number = episode.episode_number,
        title = render::attr(&episode.title),
        description = render::opt(&episode.description),
        published = render::opt(&episode.date_published),
        season_id = episode.season_id,
    );

    Ok(Html(render::page("Edit episode", true, flash_message.as_deref(), &body)).into_response())
}

/// POST /episodes/{id}/edit
/// Multi-select fields arrive as repeated keys, which serde-based form
/// extraction cannot represent, so the body is parsed by hand. The selected
/// id sets replace the whole membership, and the field patch commits in the
/// same transaction: either the whole edit lands or none of it does.
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
    RawForm(body): RawForm,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let Some(episode) = state.store.get_episode(id).await? else {
        flash(&session, "Episode not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };
    let back = format!("/seasons/{}/episodes", episode.season_id);

    let mut patch = EpisodePatch::default();
    let mut actor_ids: Vec<i32> = Vec::new();
    let mut crew_ids: Vec<i32> = Vec::new();

    for (key, value) in url::form_urlencoded::parse(&body) {
        let value = value.into_owned();
        match key.as_ref() {
            "episode_number" => patch.episode_number = Some(value.trim().parse().unwrap_or(0)),
            "title" => patch.title = Some(value),
            // Blank clears the stored value; the form always submits every field
            "description" => patch.description = Some(value),
            "rating" => patch.rating = blank_to_none(value).map(|r| r.parse().unwrap_or(-1)),
            "date_published" => patch.date_published = Some(value),
            "actor_ids" => {
                if let Ok(actor_id) = value.trim().parse() {
                    actor_ids.push(actor_id);
                }
            }
            "crew_ids" => {
                if let Ok(crew_id) = value.trim().parse() {
                    crew_ids.push(crew_id);
                }
            }
            _ => {}
        }
    }

    if let Err(errors) = validate_episode_patch(&patch) {
        flash(&session, errors.to_string()).await?;
        return Ok(Redirect::to(&format!("/episodes/{id}/edit")).into_response());
    }

    // Deselecting everything clears the membership.
    match state
        .store
        .apply_episode_edit(id, &patch, &actor_ids, &crew_ids)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            flash(&session, "Episode not found").await?;
            return Ok(Redirect::to("/shows").into_response());
        }
        Err(err) if is_conflict(&err) => {
            flash(&session, "That episode number already exists in this season").await?;
            return Ok(Redirect::to(&format!("/episodes/{id}/edit")).into_response());
        }
        Err(err) if is_missing_reference(&err) => {
            flash(&session, "A selected person no longer exists").await?;
            return Ok(Redirect::to(&format!("/episodes/{id}/edit")).into_response());
        }
        Err(err) => return Err(err.into()),
    }

    flash(&session, "Episode updated").await?;
    Ok(Redirect::to(&back).into_response())
}

/// POST /episodes/{id}/delete
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Response, UiError> {
    require_admin(&session, "/shows").await?;

    let Some(episode) = state.store.get_episode(id).await? else {
        flash(&session, "Episode not found").await?;
        return Ok(Redirect::to("/shows").into_response());
    };

    state.store.delete_episode(id).await?;
    flash(&session, "Episode deleted").await?;

    Ok(Redirect::to(&format!("/seasons/{}/episodes", episode.season_id)).into_response())
}
