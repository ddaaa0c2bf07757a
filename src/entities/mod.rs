pub mod actors;
pub mod crews;
pub mod episode_actors;
pub mod episode_crew;
pub mod episodes;
pub mod screen_times;
pub mod seasons;
pub mod tv_shows;
pub mod users;

pub mod prelude {
    pub use super::actors::Entity as Actors;
    pub use super::crews::Entity as Crews;
    pub use super::episode_actors::Entity as EpisodeActors;
    pub use super::episode_crew::Entity as EpisodeCrew;
    pub use super::episodes::Entity as Episodes;
    pub use super::screen_times::Entity as ScreenTimes;
    pub use super::seasons::Entity as Seasons;
    pub use super::tv_shows::Entity as TvShows;
    pub use super::users::Entity as Users;
}
