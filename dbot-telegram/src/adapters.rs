//! Adapters from Telegram (teloxide) types to dbot_core types.
//! Depends only on teloxide and dbot_core type definitions.

use dbot_core::{Chat, Update, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to a core [`Update`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    /// Builds an [`Update`] from a text message; returns `None` for anything without text.
    pub fn to_update(&self) -> Option<Update> {
        let text = self.0.text()?;
        let mut update = Update::new(
            self.0.id.0,
            Chat {
                id: self.0.chat.id.0,
                chat_type: self.chat_type().to_string(),
            },
            self.0.from.as_ref().map(|u| TelegramUserWrapper(u).to_core()),
            text,
        );
        update.received_at = self.0.date;
        Some(update)
    }

    fn chat_type(&self) -> &'static str {
        let chat = &self.0.chat;
        if chat.is_private() {
            "private"
        } else if chat.is_group() {
            "group"
        } else if chat.is_supergroup() {
            "supergroup"
        } else if chat.is_channel() {
            "channel"
        } else {
            "unknown"
        }
    }
}
