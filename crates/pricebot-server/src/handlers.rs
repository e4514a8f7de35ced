use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;

use crate::services::{price, user};

/// Reply to `/help`, pre-escaped for MarkdownV2.
pub const HELP_TEXT: &str = r"*Price bot*

/start \- register this chat and say hello
/price \- show the current price
/list \- list the profiles you follow
/help \- show this message

Prices are provided by CoinGecko\. Happy tracking\!";

pub const NO_PROFILES_TEXT: &str = "You are not following any profiles yet.";

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    /// Deep links (`t.me/<bot>?start=<payload>`) carry a payload, which is accepted and ignored.
    #[command(description = "Start the bot")]
    Start(String),
    #[command(description = "Show the current price")]
    Price,
    #[command(description = "List the profiles you follow")]
    List,
    #[command(description = "Display help message")]
    Help,
}

/// Asset quoted by `/price`.
#[derive(Debug, Clone)]
pub struct PriceSettings {
    pub asset_id: String,
    pub asset_name: String,
}

/// Per-update view of who is talking to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub chat_id: ChatId,
    pub username: Option<String>,
}

impl ChatContext {
    pub fn from_message(message: &Message) -> Self {
        Self {
            chat_id: message.chat.id,
            username: message.from().and_then(|user| user.username.clone()),
        }
    }
}

pub fn greeting(asset_name: &str) -> String {
    format!("Hello! I am your {asset_name} price bot. Use /price to get the current {asset_name} price.")
}

pub fn price_reply(asset_name: &str, price: &str) -> String {
    format!("Current {} price: ${}", asset_name, price)
}

pub fn render_profiles(profiles: &[String]) -> String {
    if profiles.is_empty() {
        return NO_PROFILES_TEXT.to_string();
    }

    profiles.iter()
        .enumerate()
        .map(|(i, profile)| format!("{}. {}", i + 1, profile))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tracing::instrument(skip(bot, user_service))]
pub async fn handle_start(bot: Bot, message: Message, settings: PriceSettings, user_service: Arc<user::Service>) -> anyhow::Result<()> {
    let ctx = ChatContext::from_message(&message);

    bot.send_message(ctx.chat_id, greeting(&settings.asset_name)).await?;

    let reply = match user_service.upsert_user(ctx.chat_id.0, ctx.username.clone()).await {
        Ok(()) => "Your chat has been registered.".to_string(),
        Err(e) => {
            tracing::error!("Failed to upsert chat {}: {}", ctx.chat_id, e);
            format!("Failed to save your chat: {}", e)
        }
    };

    bot.send_message(ctx.chat_id, reply).await?;

    Ok(())
}

#[tracing::instrument(skip(bot, price_service))]
pub async fn handle_price(bot: Bot, message: Message, settings: PriceSettings, price_service: Arc<price::Service>) -> anyhow::Result<()> {
    let price = price_service.fetch_price(&settings.asset_id).await;
    bot.send_message(message.chat.id, price_reply(&settings.asset_name, &price)).await?;
    Ok(())
}

#[tracing::instrument(skip(bot, user_service))]
pub async fn handle_list(bot: Bot, message: Message, user_service: Arc<user::Service>) -> anyhow::Result<()> {
    let ctx = ChatContext::from_message(&message);

    let reply = match user_service.list_followed_profiles(ctx.chat_id.0).await {
        Ok(profiles) => render_profiles(&profiles),
        Err(e) => {
            tracing::error!("Failed to list followed profiles for chat {}: {}", ctx.chat_id, e);
            format!("Failed to load followed profiles: {}", e)
        }
    };

    bot.send_message(ctx.chat_id, reply).await?;

    Ok(())
}

#[tracing::instrument(skip(bot))]
pub async fn handle_help(bot: Bot, message: Message) -> anyhow::Result<()> {
    bot.send_message(message.chat.id, HELP_TEXT).parse_mode(ParseMode::MarkdownV2).await?;
    Ok(())
}
