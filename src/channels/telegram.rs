use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, InputFile, MessageId, ParseMode};
use tracing::{error, info, warn};

use crate::bill::{handle_split_command, BillSettings, HELP_TEXT};
use crate::config::Config;
use crate::delivery::{DeliveryError, Markup, ReplySink};
use crate::slash_commands::{parse as parse_slash_command, SlashCommand};

pub struct AppState {
    pub settings: BillSettings,
    /// Username without `@`, used to ignore commands addressed to other bots.
    pub bot_username: Option<String>,
}

impl From<teloxide::RequestError> for DeliveryError {
    fn from(e: teloxide::RequestError) -> Self {
        DeliveryError::Transport(e.to_string())
    }
}

#[allow(deprecated)]
fn telegram_parse_mode(markup: Markup) -> Option<ParseMode> {
    match markup {
        Markup::Plain => None,
        Markup::Markdown => Some(ParseMode::Markdown),
    }
}

/// Reply channel bound to one inbound Telegram message.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            message_id,
        }
    }
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn send_photo(&self, url: &str, caption: &str) -> Result<(), DeliveryError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| DeliveryError::Transport(format!("invalid QR url {url}: {e}")))?;
        #[allow(deprecated)]
        self.bot
            .send_photo(self.chat_id, InputFile::url(url))
            .caption(caption)
            .parse_mode(ParseMode::Markdown)
            .await?;
        Ok(())
    }

    async fn send_text(&self, text: &str, markup: Markup) -> Result<(), DeliveryError> {
        let mut request = self.bot.send_message(self.chat_id, text);
        if let Some(mode) = telegram_parse_mode(markup) {
            request = request.parse_mode(mode);
        }
        request.await?;
        Ok(())
    }

    async fn delete_command(&self) -> Result<(), DeliveryError> {
        self.bot.delete_message(self.chat_id, self.message_id).await?;
        Ok(())
    }
}

pub async fn run_bot(config: Config) -> anyhow::Result<()> {
    let bot = Bot::new(&config.telegram_bot_token);

    // Register slash commands so they appear in the Telegram menu
    let commands = [
        BotCommand::new("c", "Chia bill: /c ..."),
        BotCommand::new("help", "Huong dan su dung"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        error!("Failed to set Telegram bot commands: {}", e);
    }

    let bot_username = match bot.get_me().await {
        Ok(me) => me.user.username.clone(),
        Err(e) => {
            warn!("Failed to fetch bot identity: {}", e);
            None
        }
    };
    info!(
        "Telegram bot ready as @{}",
        bot_username.as_deref().unwrap_or("unknown")
    );

    let state = Arc::new(AppState {
        settings: BillSettings::from(&config),
        bot_username,
    });

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(invocation) = parse_slash_command(text, state.bot_username.as_deref()) else {
        return Ok(());
    };

    match invocation.command {
        SlashCommand::Split => {
            let sink = TelegramSink::new(bot, msg.chat.id, msg.id);
            let outcome = handle_split_command(&sink, &invocation.args, &state.settings).await?;
            info!(
                "Handled /c in chat {}: stage={:?} via={:?}",
                msg.chat.id, outcome.stage, outcome.delivered_via
            );
        }
        SlashCommand::Help => {
            bot.send_message(msg.chat.id, HELP_TEXT).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    #[test]
    fn test_app_state_carries_bill_settings() {
        let config = test_config();
        let state = AppState {
            settings: BillSettings::from(&config),
            bot_username: Some("split_bot".into()),
        };
        assert_eq!(state.settings.defaults.default_bank.as_deref(), Some("mb"));
        assert_eq!(state.settings.content_limit, 25);
    }

    #[test]
    fn test_parse_mode_mapping() {
        assert!(telegram_parse_mode(Markup::Plain).is_none());
        assert!(telegram_parse_mode(Markup::Markdown).is_some());
    }
}
