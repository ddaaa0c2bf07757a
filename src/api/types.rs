use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::db::User;
use crate::entities::{actors, crews, episodes, screen_times, seasons, tv_shows};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShowDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
}

impl From<tv_shows::Model> for ShowDto {
    fn from(model: tv_shows::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeasonDto {
    pub id: i32,
    pub tvshow_id: i32,
    pub season_number: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_started: Option<String>,
    pub date_ended: Option<String>,
}

impl From<seasons::Model> for SeasonDto {
    fn from(model: seasons::Model) -> Self {
        Self {
            id: model.id,
            tvshow_id: model.tvshow_id,
            season_number: model.season_number,
            title: model.title,
            description: model.description,
            date_started: model.date_started,
            date_ended: model.date_ended,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EpisodeDto {
    pub id: i32,
    pub season_id: i32,
    pub episode_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub date_published: Option<String>,
}

impl From<episodes::Model> for EpisodeDto {
    fn from(model: episodes::Model) -> Self {
        Self {
            id: model.id,
            season_id: model.season_id,
            episode_number: model.episode_number,
            title: model.title,
            description: model.description,
            rating: model.rating,
            date_published: model.date_published,
        }
    }
}

/// Episode detail view with its current association membership.
#[derive(Debug, Serialize)]
pub struct EpisodeDetailDto {
    #[serde(flatten)]
    pub episode: EpisodeDto,
    pub actor_ids: Vec<i32>,
    pub crew_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct ActorDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl From<actors::Model> for ActorDto {
    fn from(model: actors::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CrewDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    pub person_definition: Option<String>,
}

impl From<crews::Model> for CrewDto {
    fn from(model: crews::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            person_definition: model.person_definition,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScreenTimeDto {
    pub id: i32,
    pub actor_id: i32,
    pub episode_id: i32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub role_name: Option<String>,
    pub role_type: Option<String>,
}

impl From<screen_times::Model> for ScreenTimeDto {
    fn from(model: screen_times::Model) -> Self {
        Self {
            id: model.id,
            actor_id: model.actor_id,
            episode_id: model.episode_id,
            start_time: model.start_time,
            end_time: model.end_time,
            role_name: model.role_name,
            role_type: model.role_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserProfileDto {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: String,
}

impl From<User> for UserProfileDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredDto {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct TokenDto {
    pub access_token: String,
}

/// Confirmation payload for deletes
#[derive(Debug, Serialize)]
pub struct DeletedDto {
    pub id: i32,
}

/// Replace-semantics membership payload for association updates
#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub ids: Vec<i32>,
}
