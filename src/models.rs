//! Input shapes shared by both surfaces. API handlers deserialize these
//! straight from JSON bodies; UI form handlers build them from form fields.
//! `*Input` is a full create payload, `*Patch` carries only the fields the
//! caller wants changed.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ShowInput {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonInput {
    pub tvshow_id: i32,
    pub season_number: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_started: Option<String>,
    pub date_ended: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonPatch {
    pub season_number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_started: Option<String>,
    pub date_ended: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInput {
    pub season_id: i32,
    pub episode_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub date_published: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodePatch {
    pub episode_number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub date_published: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorInput {
    pub first_name: String,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewInput {
    pub first_name: String,
    pub last_name: Option<String>,
    pub person_definition: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenTimeInput {
    pub actor_id: i32,
    pub episode_id: i32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub role_name: Option<String>,
    pub role_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationInput {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}
