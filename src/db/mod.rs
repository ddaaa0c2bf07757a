use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::auth::Role;
use crate::config::SecurityConfig;
use crate::entities::{actors, crews, episodes, screen_times, seasons, tv_shows};
use crate::models::{
    ActorInput, CrewInput, EpisodeInput, EpisodePatch, RegistrationInput, ScreenTimeInput,
    SeasonInput, SeasonPatch, ShowInput, ShowPatch,
};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

/// Facade over the database connection. All domain operations from either
/// surface go through here; handlers never touch entities directly.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn season_repo(&self) -> repositories::season::SeasonRepository {
        repositories::season::SeasonRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    fn person_repo(&self) -> repositories::person::PersonRepository {
        repositories::person::PersonRepository::new(self.conn.clone())
    }

    fn screen_time_repo(&self) -> repositories::screen_time::ScreenTimeRepository {
        repositories::screen_time::ScreenTimeRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        input: &RegistrationInput,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo().create(input, role, security).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_credentials(username, password).await
    }

    pub async fn update_user_role(&self, user_id: i32, role: Role) -> Result<()> {
        self.user_repo().update_role(user_id, role).await
    }

    // ========== Shows ==========

    pub async fn list_shows(&self) -> Result<Vec<tv_shows::Model>> {
        self.show_repo().list().await
    }

    pub async fn get_show(&self, id: i32) -> Result<Option<tv_shows::Model>> {
        self.show_repo().get(id).await
    }

    pub async fn create_show(&self, input: &ShowInput) -> Result<tv_shows::Model> {
        self.show_repo().create(input).await
    }

    pub async fn update_show(&self, id: i32, patch: &ShowPatch) -> Result<Option<tv_shows::Model>> {
        self.show_repo().update(id, patch).await
    }

    pub async fn delete_show(&self, id: i32) -> Result<bool> {
        self.show_repo().delete(id).await
    }

    // ========== Seasons ==========

    pub async fn list_seasons(&self) -> Result<Vec<seasons::Model>> {
        self.season_repo().list().await
    }

    pub async fn list_seasons_for_show(&self, tvshow_id: i32) -> Result<Vec<seasons::Model>> {
        self.season_repo().list_for_show(tvshow_id).await
    }

    pub async fn get_season(&self, id: i32) -> Result<Option<seasons::Model>> {
        self.season_repo().get(id).await
    }

    pub async fn create_season(&self, input: &SeasonInput) -> Result<seasons::Model> {
        self.season_repo().create(input).await
    }

    pub async fn update_season(
        &self,
        id: i32,
        patch: &SeasonPatch,
    ) -> Result<Option<seasons::Model>> {
        self.season_repo().update(id, patch).await
    }

    pub async fn delete_season(&self, id: i32) -> Result<bool> {
        self.season_repo().delete(id).await
    }

    // ========== Episodes ==========

    pub async fn list_episodes(&self) -> Result<Vec<episodes::Model>> {
        self.episode_repo().list().await
    }

    pub async fn list_episodes_for_season(&self, season_id: i32) -> Result<Vec<episodes::Model>> {
        self.episode_repo().list_for_season(season_id).await
    }

    pub async fn get_episode(&self, id: i32) -> Result<Option<episodes::Model>> {
        self.episode_repo().get(id).await
    }

    pub async fn create_episode(&self, input: &EpisodeInput) -> Result<episodes::Model> {
        self.episode_repo().create(input).await
    }

    pub async fn update_episode(
        &self,
        id: i32,
        patch: &EpisodePatch,
    ) -> Result<Option<episodes::Model>> {
        self.episode_repo().update(id, patch).await
    }

    pub async fn delete_episode(&self, id: i32) -> Result<bool> {
        self.episode_repo().delete(id).await
    }

    pub async fn episode_actor_ids(&self, episode_id: i32) -> Result<Vec<i32>> {
        self.episode_repo().actor_ids(episode_id).await
    }

    pub async fn episode_crew_ids(&self, episode_id: i32) -> Result<Vec<i32>> {
        self.episode_repo().crew_ids(episode_id).await
    }

    pub async fn set_episode_actors(&self, episode_id: i32, actor_ids: &[i32]) -> Result<()> {
        self.episode_repo().set_actors(episode_id, actor_ids).await
    }

    pub async fn set_episode_crew(&self, episode_id: i32, crew_ids: &[i32]) -> Result<()> {
        self.episode_repo().set_crew(episode_id, crew_ids).await
    }

    /// Field patch plus both membership replacements, committed atomically.
    /// Returns false when the episode no longer exists.
    pub async fn apply_episode_edit(
        &self,
        episode_id: i32,
        patch: &EpisodePatch,
        actor_ids: &[i32],
        crew_ids: &[i32],
    ) -> Result<bool> {
        self.episode_repo()
            .apply_edit(episode_id, patch, actor_ids, crew_ids)
            .await
    }

    // ========== People ==========

    pub async fn list_actors(&self) -> Result<Vec<actors::Model>> {
        self.person_repo().list_actors().await
    }

    pub async fn get_actor(&self, id: i32) -> Result<Option<actors::Model>> {
        self.person_repo().get_actor(id).await
    }

    pub async fn create_actor(&self, input: &ActorInput) -> Result<actors::Model> {
        self.person_repo().create_actor(input).await
    }

    pub async fn delete_actor(&self, id: i32) -> Result<bool> {
        self.person_repo().delete_actor(id).await
    }

    pub async fn list_crews(&self) -> Result<Vec<crews::Model>> {
        self.person_repo().list_crews().await
    }

    pub async fn get_crew(&self, id: i32) -> Result<Option<crews::Model>> {
        self.person_repo().get_crew(id).await
    }

    pub async fn create_crew(&self, input: &CrewInput) -> Result<crews::Model> {
        self.person_repo().create_crew(input).await
    }

    pub async fn delete_crew(&self, id: i32) -> Result<bool> {
        self.person_repo().delete_crew(id).await
    }

    // ========== Screen times ==========

    pub async fn create_screen_time(
        &self,
        input: &ScreenTimeInput,
    ) -> Result<screen_times::Model> {
        self.screen_time_repo().create(input).await
    }

    pub async fn list_screen_times_for_episode(
        &self,
        episode_id: i32,
    ) -> Result<Vec<screen_times::Model>> {
        self.screen_time_repo().list_for_episode(episode_id).await
    }

    pub async fn list_screen_times_for_actor(
        &self,
        actor_id: i32,
    ) -> Result<Vec<screen_times::Model>> {
        self.screen_time_repo().list_for_actor(actor_id).await
    }
}
