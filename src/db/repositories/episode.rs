use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashSet;

use super::normalize_text;
use crate::entities::{episode_actors, episode_crew, episodes, prelude::*};
use crate::models::{EpisodeInput, EpisodePatch};

pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<episodes::Model>> {
        Episodes::find()
            .all(&self.conn)
            .await
            .context("Failed to list episodes")
    }

    pub async fn list_for_season(&self, season_id: i32) -> Result<Vec<episodes::Model>> {
        Episodes::find()
            .filter(episodes::Column::SeasonId.eq(season_id))
            .order_by_asc(episodes::Column::EpisodeNumber)
            .all(&self.conn)
            .await
            .context("Failed to list episodes for season")
    }

    pub async fn get(&self, id: i32) -> Result<Option<episodes::Model>> {
        Episodes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query episode")
    }

    pub async fn create(&self, input: &EpisodeInput) -> Result<episodes::Model> {
        let active = episodes::ActiveModel {
            season_id: Set(input.season_id),
            episode_number: Set(input.episode_number),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.as_deref().and_then(normalize_text)),
            rating: Set(input.rating),
            date_published: Set(input.date_published.as_deref().and_then(normalize_text)),
            ..Default::default()
        };

        Ok(active.insert(&self.conn).await?)
    }

    pub async fn update(&self, id: i32, patch: &EpisodePatch) -> Result<Option<episodes::Model>> {
        let Some(episode) = Episodes::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: episodes::ActiveModel = episode.clone().into();
        if !apply_patch(&mut active, patch) {
            return Ok(Some(episode));
        }

        Ok(Some(active.update(&self.conn).await?))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Episodes::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn actor_ids(&self, episode_id: i32) -> Result<Vec<i32>> {
        let rows = EpisodeActors::find()
            .filter(episode_actors::Column::EpisodeId.eq(episode_id))
            .all(&self.conn)
            .await
            .context("Failed to load episode actors")?;

        Ok(rows.into_iter().map(|r| r.actor_id).collect())
    }

    pub async fn crew_ids(&self, episode_id: i32) -> Result<Vec<i32>> {
        let rows = EpisodeCrew::find()
            .filter(episode_crew::Column::EpisodeId.eq(episode_id))
            .all(&self.conn)
            .await
            .context("Failed to load episode crew")?;

        Ok(rows.into_iter().map(|r| r.crew_id).collect())
    }

    /// Replace-semantics membership update: the submitted set becomes the
    /// episode's entire actor association. Removed rows are deleted and new
    /// rows inserted inside one transaction, so a concurrent reader never
    /// observes a half-applied set.
    pub async fn set_actors(&self, episode_id: i32, actor_ids: &[i32]) -> Result<()> {
        let txn = self.conn.begin().await?;
        replace_actors(&txn, episode_id, actor_ids).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Same replace semantics for crew assignments.
    pub async fn set_crew(&self, episode_id: i32, crew_ids: &[i32]) -> Result<()> {
        let txn = self.conn.begin().await?;
        replace_crew(&txn, episode_id, crew_ids).await?;
        txn.commit().await?;
        Ok(())
    }

    /// A combined edit: the field patch plus both membership replacements in
    /// one transaction. Either the whole edit commits or none of it does; a
    /// submitted id that no longer exists rolls everything back.
    pub async fn apply_edit(
        &self,
        id: i32,
        patch: &EpisodePatch,
        actor_ids: &[i32],
        crew_ids: &[i32],
    ) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let Some(episode) = Episodes::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        let mut active: episodes::ActiveModel = episode.into();
        if apply_patch(&mut active, patch) {
            active.update(&txn).await?;
        }

        replace_actors(&txn, id, actor_ids).await?;
        replace_crew(&txn, id, crew_ids).await?;

        txn.commit().await?;
        Ok(true)
    }
}

fn apply_patch(active: &mut episodes::ActiveModel, patch: &EpisodePatch) -> bool {
    let mut changed = false;

    if let Some(number) = patch.episode_number {
        active.episode_number = Set(number);
        changed = true;
    }
    if let Some(title) = &patch.title {
        active.title = Set(title.trim().to_string());
        changed = true;
    }
    if let Some(description) = &patch.description {
        active.description = Set(normalize_text(description));
        changed = true;
    }
    if let Some(rating) = patch.rating {
        active.rating = Set(Some(rating));
        changed = true;
    }
    if let Some(date_published) = &patch.date_published {
        active.date_published = Set(normalize_text(date_published));
        changed = true;
    }

    changed
}

async fn replace_actors<C: ConnectionTrait>(
    conn: &C,
    episode_id: i32,
    actor_ids: &[i32],
) -> Result<()> {
    let current: HashSet<i32> = EpisodeActors::find()
        .filter(episode_actors::Column::EpisodeId.eq(episode_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.actor_id)
        .collect();
    let desired: HashSet<i32> = actor_ids.iter().copied().collect();

    let removed: Vec<i32> = current.difference(&desired).copied().collect();
    if !removed.is_empty() {
        EpisodeActors::delete_many()
            .filter(episode_actors::Column::EpisodeId.eq(episode_id))
            .filter(episode_actors::Column::ActorId.is_in(removed))
            .exec(conn)
            .await?;
    }

    let added: Vec<episode_actors::ActiveModel> = desired
        .difference(&current)
        .map(|&actor_id| episode_actors::ActiveModel {
            episode_id: Set(episode_id),
            actor_id: Set(actor_id),
        })
        .collect();
    if !added.is_empty() {
        EpisodeActors::insert_many(added).exec(conn).await?;
    }

    Ok(())
}

async fn replace_crew<C: ConnectionTrait>(
    conn: &C,
    episode_id: i32,
    crew_ids: &[i32],
) -> Result<()> {
    let current: HashSet<i32> = EpisodeCrew::find()
        .filter(episode_crew::Column::EpisodeId.eq(episode_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.crew_id)
        .collect();
    let desired: HashSet<i32> = crew_ids.iter().copied().collect();

    let removed: Vec<i32> = current.difference(&desired).copied().collect();
    if !removed.is_empty() {
        EpisodeCrew::delete_many()
            .filter(episode_crew::Column::EpisodeId.eq(episode_id))
            .filter(episode_crew::Column::CrewId.is_in(removed))
            .exec(conn)
            .await?;
    }

    let added: Vec<episode_crew::ActiveModel> = desired
        .difference(&current)
        .map(|&crew_id| episode_crew::ActiveModel {
            episode_id: Set(episode_id),
            crew_id: Set(crew_id),
            ..Default::default()
        })
        .collect();
    if !added.is_empty() {
        EpisodeCrew::insert_many(added).exec(conn).await?;
    }

    Ok(())
}
