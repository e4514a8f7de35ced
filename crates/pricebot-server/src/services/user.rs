use sea_orm::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, QueryOrder, QuerySelect, TransactionTrait};

use pricebot_entities::{followed_profile, user};

#[derive(Clone, Debug)]
pub struct Service {
    db: DatabaseConnection,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),
}

impl Service {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores the chat unless it is already known. An existing row keeps its original username.
    #[tracing::instrument]
    pub async fn upsert_user(&self, chat_id: i64, username: Option<String>) -> Result<(), Error> {
        let txn = self.db.begin().await?;

        let inserted = user::Entity::insert(user::ActiveModel {
            chat_id: ActiveValue::Set(chat_id),
            username: ActiveValue::Set(username),
        })
            .on_conflict(OnConflict::column(user::Column::ChatId).do_nothing().to_owned())
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        tracing::debug!("Upserted chat {}, {} row(s) inserted", chat_id, inserted);

        Ok(())
    }

    /// Profile ids followed by the chat, oldest follow first.
    #[tracing::instrument]
    pub async fn list_followed_profiles(&self, chat_id: i64) -> Result<Vec<String>, Error> {
        let txn = self.db.begin().await?;

        let profiles = followed_profile::Entity::find()
            .select_only()
            .column(followed_profile::Column::ProfileId)
            .filter(followed_profile::Column::ChatId.eq(chat_id))
            .order_by_asc(followed_profile::Column::FollowDate)
            .into_tuple::<String>()
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok(profiles)
    }
}
