use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

use pricebot_entities::{followed_profile, user};

const FOLLOW_DATE_INDEX: &str = "idx_followed_profiles_chat_id_follow_date";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        manager.create_table(schema.create_table_from_entity(user::Entity).if_not_exists().to_owned()).await?;
        manager.create_table(schema.create_table_from_entity(followed_profile::Entity).if_not_exists().to_owned()).await?;

        // listing filters by chat and sorts by follow date
        manager.create_index(
            Index::create()
                .name(FOLLOW_DATE_INDEX)
                .table(followed_profile::Entity)
                .col(followed_profile::Column::ChatId)
                .col(followed_profile::Column::FollowDate)
                .if_not_exists()
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(followed_profile::Entity).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(user::Entity).if_exists().to_owned()).await?;

        Ok(())
    }
}
