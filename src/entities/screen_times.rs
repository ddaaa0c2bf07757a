use sea_orm::entity::prelude::*;

/// One interval of an actor's appearance in an episode. The same actor may
/// appear several times in one episode, distinguished by start_time;
/// (actor_id, episode_id, start_time) is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "screen_times")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub actor_id: i32,

    pub episode_id: i32,

    pub start_time: Option<String>,

    pub end_time: Option<String>,

    pub role_name: Option<String>,

    pub role_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::actors::Entity",
        from = "Column::ActorId",
        to = "super::actors::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Actors,

    #[sea_orm(
        belongs_to = "super::episodes::Entity",
        from = "Column::EpisodeId",
        to = "super::episodes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Episodes,
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Actors.def()
    }
}

impl Related<super::episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
