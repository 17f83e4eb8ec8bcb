//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Production code sends messages via Telegram; tests can substitute another Bot impl.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, DbotError, Result, SentMessage};
use teloxide::{
    payloads::SendMessageSetters,
    prelude::*,
    types::{ChatId, MessageId, ParseMode, ReplyParameters},
};

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
    parse_mode: Option<ParseMode>,
}

impl TelegramBotAdapter {
    /// Creates an adapter sending HTML.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self {
            bot,
            parse_mode: Some(ParseMode::Html),
        }
    }

    /// Overrides the outbound parse mode; `None` sends plain text.
    pub fn with_parse_mode(mut self, parse_mode: Option<ParseMode>) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_chunk(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<SentMessage> {
        let mut request = self.bot.send_message(ChatId(chat_id), text.to_string());
        if let Some(mode) = self.parse_mode {
            request = request.parse_mode(mode);
        }
        if let Some(id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(id)));
        }
        let sent = request
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(SentMessage {
            chat_id: sent.chat.id.0,
            message_id: sent.id.0,
        })
    }
}
