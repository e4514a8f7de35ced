use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub chat_id: i64,
    pub username: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::followed_profile::Entity")]
    FollowedProfiles,
}

impl Related<super::followed_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FollowedProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
