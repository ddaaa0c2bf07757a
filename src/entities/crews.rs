use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "crews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub first_name: String,

    pub last_name: Option<String>,

    /// Free-text role, e.g. "director" or "key grip"
    pub person_definition: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::episode_crew::Entity")]
    EpisodeCrew,
}

impl Related<super::episode_crew::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EpisodeCrew.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
