use sea_orm::entity::prelude::*;

/// One episode of a season. (season_id, episode_number) is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "episodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub season_id: i32,

    pub episode_number: i32,

    pub title: String,

    pub description: Option<String>,

    /// 0..=10 when present
    pub rating: Option<i32>,

    pub date_published: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::seasons::Entity",
        from = "Column::SeasonId",
        to = "super::seasons::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Seasons,

    #[sea_orm(has_many = "super::screen_times::Entity")]
    ScreenTimes,

    #[sea_orm(has_many = "super::episode_crew::Entity")]
    EpisodeCrew,
}

impl Related<super::seasons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seasons.def()
    }
}

impl Related<super::screen_times::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScreenTimes.def()
    }
}

impl Related<super::episode_crew::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EpisodeCrew.def()
    }
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        super::episode_actors::Relation::Actors.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::episode_actors::Relation::Episodes.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
