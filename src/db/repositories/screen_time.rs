use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{prelude::*, screen_times};
use crate::models::ScreenTimeInput;

pub struct ScreenTimeRepository {
    conn: DatabaseConnection,
}

impl ScreenTimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// A duplicate (actor, episode, start_time) triple surfaces as the
    /// database's unique-constraint error.
    pub async fn create(&self, input: &ScreenTimeInput) -> Result<screen_times::Model> {
        let active = screen_times::ActiveModel {
            actor_id: Set(input.actor_id),
            episode_id: Set(input.episode_id),
            start_time: Set(input.start_time.clone()),
            end_time: Set(input.end_time.clone()),
            role_name: Set(input.role_name.clone()),
            role_type: Set(input.role_type.clone()),
            ..Default::default()
        };

        Ok(active.insert(&self.conn).await?)
    }

    pub async fn list_for_episode(&self, episode_id: i32) -> Result<Vec<screen_times::Model>> {
        ScreenTimes::find()
            .filter(screen_times::Column::EpisodeId.eq(episode_id))
            .all(&self.conn)
            .await
            .context("Failed to list screen times for episode")
    }

    pub async fn list_for_actor(&self, actor_id: i32) -> Result<Vec<screen_times::Model>> {
        ScreenTimes::find()
            .filter(screen_times::Column::ActorId.eq(actor_id))
            .all(&self.conn)
            .await
            .context("Failed to list screen times for actor")
    }
}
