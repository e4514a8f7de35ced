use std::sync::Arc;
use std::time::Duration;

use pricebot_migrator::{Migrator, MigratorTrait};
use sea_orm::Database;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use teloxide::utils::command::BotCommands;

use crate::error_handler::UpdateErrorHandler;
use crate::handlers::{Command, PriceSettings};
use crate::services::{price, user};

mod error_handler;
mod handlers;
mod services;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    // fails before any network activity when BOT_TOKEN or DATABASE_URL is absent
    let config = pricebot_common::config::Config::new()?;

    // Initialize the tracer
    pricebot_common::observability::tracing::init_tracer(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
        &config,
    )?;

    let db = Database::connect(&config.database_url).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
        log::info!("Database migrations applied");
    }

    let client = teloxide::net::default_reqwest_settings()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
        .build()?;

    let bot = Bot::with_client(&config.bot_token, client)
        .set_api_url(config.api_server.parse()?);

    let settings = PriceSettings {
        asset_id: config.price_asset_id.clone(),
        asset_name: config.price_asset_name.clone(),
    };
    let user_service = Arc::new(user::Service::new(db.clone()));
    let price_service = Arc::new(price::Service::new(
        config.price_api_url.clone(),
        Duration::from_secs(config.price_timeout_secs),
    )?);

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register command menu: {}", err);
    }

    let handlers = Update::filter_message()
        .filter_command::<Command>()
        .branch(dptree::case![Command::Start(_payload)].endpoint(handlers::handle_start))
        .branch(dptree::case![Command::Price].endpoint(handlers::handle_price))
        .branch(dptree::case![Command::List].endpoint(handlers::handle_list))
        .branch(dptree::case![Command::Help].endpoint(handlers::handle_help));

    let listener = {
        let builder = Polling::builder(bot.clone())
            .timeout(Duration::from_secs(config.polling_timeout_secs.into()));

        if config.drop_pending_updates {
            builder.drop_pending_updates().build()
        } else {
            builder.build()
        }
    };

    log::info!("Bot is running, quoting {} ({})", settings.asset_name, settings.asset_id);

    Dispatcher::builder(bot, handlers)
        .distribution_function(|_| None::<std::convert::Infallible>)
        .dependencies(dptree::deps![settings, user_service, price_service])
        .default_handler(|update| async move {
            tracing::debug!("Ignoring update {:?}", update.id);
        })
        .error_handler(UpdateErrorHandler::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(listener, UpdateErrorHandler::new())
        .await;

    db.close().await?;

    Ok(())
}
