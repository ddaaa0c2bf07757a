use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::normalize_text;
use crate::entities::{prelude::*, seasons};
use crate::models::{SeasonInput, SeasonPatch};

pub struct SeasonRepository {
    conn: DatabaseConnection,
}

impl SeasonRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<seasons::Model>> {
        Seasons::find()
            .all(&self.conn)
            .await
            .context("Failed to list seasons")
    }

    pub async fn list_for_show(&self, tvshow_id: i32) -> Result<Vec<seasons::Model>> {
        Seasons::find()
            .filter(seasons::Column::TvshowId.eq(tvshow_id))
            .all(&self.conn)
            .await
            .context("Failed to list seasons for show")
    }

    pub async fn get(&self, id: i32) -> Result<Option<seasons::Model>> {
        Seasons::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query season")
    }

    /// A duplicate (show, season_number) pair surfaces as the database's
    /// unique-constraint error; callers translate it to a conflict.
    pub async fn create(&self, input: &SeasonInput) -> Result<seasons::Model> {
        let active = seasons::ActiveModel {
            tvshow_id: Set(input.tvshow_id),
            season_number: Set(input.season_number),
            title: Set(input.title.as_deref().and_then(normalize_text)),
            description: Set(input.description.as_deref().and_then(normalize_text)),
            date_started: Set(input.date_started.as_deref().and_then(normalize_text)),
            date_ended: Set(input.date_ended.as_deref().and_then(normalize_text)),
            ..Default::default()
        };

        Ok(active.insert(&self.conn).await?)
    }

    pub async fn update(&self, id: i32, patch: &SeasonPatch) -> Result<Option<seasons::Model>> {
        let Some(season) = Seasons::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: seasons::ActiveModel = season.clone().into();
        let mut changed = false;

        if let Some(number) = patch.season_number {
            active.season_number = Set(number);
            changed = true;
        }
        if let Some(title) = &patch.title {
            active.title = Set(normalize_text(title));
            changed = true;
        }
        if let Some(description) = &patch.description {
            active.description = Set(normalize_text(description));
            changed = true;
        }
        if let Some(date_started) = &patch.date_started {
            active.date_started = Set(normalize_text(date_started));
            changed = true;
        }
        if let Some(date_ended) = &patch.date_ended {
            active.date_ended = Set(normalize_text(date_ended));
            changed = true;
        }

        if !changed {
            return Ok(Some(season));
        }

        Ok(Some(active.update(&self.conn).await?))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Seasons::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
