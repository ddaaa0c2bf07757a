use sea_orm::entity::prelude::*;

/// A crew member's assignment to an episode. Unlike `episode_actors` this is
/// its own addressable record with a surrogate id; (episode_id, crew_id) is
/// still unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "episode_crew")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub episode_id: i32,

    pub crew_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::episodes::Entity",
        from = "Column::EpisodeId",
        to = "super::episodes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Episodes,

    #[sea_orm(
        belongs_to = "super::crews::Entity",
        from = "Column::CrewId",
        to = "super::crews::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Crews,
}

impl Related<super::episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episodes.def()
    }
}

impl Related<super::crews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
