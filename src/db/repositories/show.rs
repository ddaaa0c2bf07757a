use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use super::normalize_text;
use crate::entities::{prelude::*, tv_shows};
use crate::models::{ShowInput, ShowPatch};

pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<tv_shows::Model>> {
        TvShows::find()
            .all(&self.conn)
            .await
            .context("Failed to list shows")
    }

    pub async fn get(&self, id: i32) -> Result<Option<tv_shows::Model>> {
        TvShows::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query show")
    }

    pub async fn create(&self, input: &ShowInput) -> Result<tv_shows::Model> {
        let active = tv_shows::ActiveModel {
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.as_deref().and_then(normalize_text)),
            ..Default::default()
        };

        Ok(active.insert(&self.conn).await?)
    }

    pub async fn update(&self, id: i32, patch: &ShowPatch) -> Result<Option<tv_shows::Model>> {
        let Some(show) = TvShows::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: tv_shows::ActiveModel = show.clone().into();
        let mut changed = false;

        if let Some(title) = &patch.title {
            active.title = Set(title.trim().to_string());
            changed = true;
        }
        if let Some(description) = &patch.description {
            active.description = Set(normalize_text(description));
            changed = true;
        }

        if !changed {
            return Ok(Some(show));
        }

        Ok(Some(active.update(&self.conn).await?))
    }

    /// Cascades through seasons, episodes and their screen-time/crew rows
    /// via the schema's ON DELETE rules, so the whole subtree goes in one
    /// atomic statement.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = TvShows::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
