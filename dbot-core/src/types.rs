//! Core types: user, chat, inbound update, sent message reference and bot identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::command::{parse_command, CommandToken};

/// User identity (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Bare username when the user has a non-empty one, otherwise first and last name joined by
    /// a space.
    pub fn display_name(&self) -> String {
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            return username.to_string();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Chat (channel, group or private) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// One inbound chat message. Immutable once received.
///
/// `command`, `mention` and `arguments` are derived from `text` when the update is built with
/// [`Update::new`]; transports that already know the command entity may fill them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub message_id: i32,
    pub chat: Chat,
    pub sender: Option<User>,
    pub text: String,
    /// Command name without the leading slash and without the `@bot` suffix.
    pub command: Option<String>,
    /// Bot username the command was addressed to (`/cmd@name`), if any.
    pub mention: Option<String>,
    /// Raw text following the command token.
    pub arguments: String,
    pub received_at: DateTime<Utc>,
}

impl Update {
    /// Builds an update and parses the command token out of `text`.
    pub fn new(message_id: i32, chat: Chat, sender: Option<User>, text: impl Into<String>) -> Self {
        let text = text.into();
        let token = parse_command(&text);
        let (command, mention, arguments) = match token {
            Some(CommandToken {
                name,
                mention,
                arguments,
            }) => (Some(name), mention, arguments),
            None => (None, None, String::new()),
        };
        Self {
            message_id,
            chat,
            sender,
            text,
            command,
            mention,
            arguments,
            received_at: Utc::now(),
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat.id
    }

    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    /// Command name, or `""` for plain messages.
    pub fn command_name(&self) -> &str {
        self.command.as_deref().unwrap_or("")
    }
}

/// Reference to a message the bot sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i32,
}

/// The bot's own identity, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotInfo {
    pub id: i64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat() -> Chat {
        Chat {
            id: 456,
            chat_type: "private".to_string(),
        }
    }

    #[test]
    fn test_update_new_parses_command() {
        let update = Update::new(1, chat(), None, "/echo@my_bot hello world");
        assert!(update.is_command());
        assert_eq!(update.command_name(), "echo");
        assert_eq!(update.mention.as_deref(), Some("my_bot"));
        assert_eq!(update.arguments, "hello world");
        assert_eq!(update.chat_id(), 456);
    }

    #[test]
    fn test_update_new_plain_message() {
        let update = Update::new(1, chat(), None, "just chatting");
        assert!(!update.is_command());
        assert_eq!(update.command_name(), "");
        assert!(update.mention.is_none());
        assert!(update.arguments.is_empty());
    }

    #[test]
    fn test_display_name() {
        let mut user = User {
            id: 1,
            username: Some("alice".to_string()),
            first_name: Some("Alice".to_string()),
            last_name: Some("Liddell".to_string()),
        };
        assert_eq!(user.display_name(), "alice");
        user.username = Some(String::new());
        assert_eq!(user.display_name(), "Alice Liddell");
        user.username = None;
        assert_eq!(user.display_name(), "Alice Liddell");
        user.last_name = None;
        assert_eq!(user.display_name(), "Alice");
    }
}
