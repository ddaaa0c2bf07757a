use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::{actors, crews, prelude::*};
use crate::models::{ActorInput, CrewInput};

/// Actors and crew share a repository; both are flat person records
/// referenced by episodes through associations that never cascade back
/// into the episode.
pub struct PersonRepository {
    conn: DatabaseConnection,
}

impl PersonRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_actors(&self) -> Result<Vec<actors::Model>> {
        Actors::find()
            .order_by_asc(actors::Column::FirstName)
            .order_by_asc(actors::Column::LastName)
            .all(&self.conn)
            .await
            .context("Failed to list actors")
    }

    pub async fn get_actor(&self, id: i32) -> Result<Option<actors::Model>> {
        Actors::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query actor")
    }

    pub async fn create_actor(&self, input: &ActorInput) -> Result<actors::Model> {
        let active = actors::ActiveModel {
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.clone()),
            ..Default::default()
        };

        Ok(active.insert(&self.conn).await?)
    }

    /// Removes the actor's screen-time rows and episode associations via the
    /// schema's ON DELETE rules; the episodes themselves are untouched.
    pub async fn delete_actor(&self, id: i32) -> Result<bool> {
        let result = Actors::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn list_crews(&self) -> Result<Vec<crews::Model>> {
        Crews::find()
            .order_by_asc(crews::Column::FirstName)
            .order_by_asc(crews::Column::LastName)
            .all(&self.conn)
            .await
            .context("Failed to list crew")
    }

    pub async fn get_crew(&self, id: i32) -> Result<Option<crews::Model>> {
        Crews::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query crew member")
    }

    pub async fn create_crew(&self, input: &CrewInput) -> Result<crews::Model> {
        let active = crews::ActiveModel {
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.clone()),
            person_definition: Set(input.person_definition.clone()),
            ..Default::default()
        };

        Ok(active.insert(&self.conn).await?)
    }

    pub async fn delete_crew(&self, id: i32) -> Result<bool> {
        let result = Crews::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
