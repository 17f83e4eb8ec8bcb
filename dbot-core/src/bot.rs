//! Bot abstraction for sending messages.
//!
//! [`Bot`] is transport-agnostic; `dbot-telegram` implements it via teloxide. Implementations only
//! provide [`Bot::send_chunk`]; [`Bot::send_text`] applies the length limit on top of it.

use crate::error::Result;
use crate::types::SentMessage;
use async_trait::async_trait;
use tracing::error;

/// Longest text (in characters) a single outbound message may carry.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Abstraction for sending text. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends one message of at most [`MAX_MESSAGE_LEN`] characters, optionally replying to `reply_to`.
    async fn send_chunk(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<SentMessage>;

    /// Sends `text`, split into consecutive chunks of at most [`MAX_MESSAGE_LEN`] characters.
    ///
    /// Chunks are sent in order and each replies to `reply_to`. The first failing chunk aborts
    /// the operation and its error is returned; later chunks are never attempted.
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<Vec<SentMessage>> {
        let chunks = split_text(text, MAX_MESSAGE_LEN);
        let mut sent = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.into_iter().enumerate() {
            match self.send_chunk(chat_id, chunk, reply_to).await {
                Ok(message) => sent.push(message),
                Err(e) => {
                    error!(chat_id = chat_id, chunk = index, error = %e, "cannot send message");
                    return Err(e);
                }
            }
        }
        Ok(sent)
    }
}

/// Splits `text` into consecutive slices of at most `max_chars` characters. Empty text yields no
/// slices.
pub fn split_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_text_sizes() {
        let text = "a".repeat(9000);
        let sizes: Vec<usize> = split_text(&text, MAX_MESSAGE_LEN)
            .iter()
            .map(|c| c.chars().count())
            .collect();
        assert_eq!(sizes, vec![4096, 4096, 808]);
    }

    #[test]
    fn test_split_text_exact_multiple() {
        let text = "b".repeat(8192);
        assert_eq!(split_text(&text, MAX_MESSAGE_LEN).len(), 2);
    }

    #[test]
    fn test_split_text_counts_characters_not_bytes() {
        let text = "é".repeat(5);
        let chunks = split_text(&text, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_split_text_empty() {
        assert!(split_text("", MAX_MESSAGE_LEN).is_empty());
    }
}
