pub mod price;
pub mod user;

/// In-memory SQLite database with the schema applied.
#[cfg(test)]
pub(crate) async fn test_db() -> sea_orm::DatabaseConnection {
    use pricebot_migrator::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    db
}

/// Inserts a followed profile dated `day` of May 2024, as the out-of-band tooling would.
#[cfg(test)]
pub(crate) async fn follow(db: &sea_orm::DatabaseConnection, chat_id: i64, profile_id: &str, day: u32) {
    use pricebot_entities::followed_profile;
    use sea_orm::{ActiveModelTrait, ActiveValue};

    followed_profile::ActiveModel {
        chat_id: ActiveValue::Set(chat_id),
        profile_id: ActiveValue::Set(profile_id.to_string()),
        follow_date: ActiveValue::Set(
            chrono::NaiveDate::from_ymd_opt(2024, 5, day).unwrap().and_hms_opt(12, 0, 0).unwrap(),
        ),
    }
        .insert(db)
        .await
        .unwrap();
}
