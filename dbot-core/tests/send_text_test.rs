//! Integration tests for the chunking contract of [`dbot_core::Bot::send_text`].
//!
//! Covers: long text split into 4096-character chunks sent in order with the same reply target,
//! and abort on the first failing chunk.

use std::sync::Mutex;

use async_trait::async_trait;
use dbot_core::{Bot, DbotError, Result, SentMessage};

/// One recorded `send_chunk` call.
#[derive(Debug, Clone)]
struct SendRecord {
    chat_id: i64,
    len: usize,
    reply_to: Option<i32>,
}

/// Mock Bot that records chunks and optionally fails on the n-th call (1-based).
struct RecordingBot {
    sent: Mutex<Vec<SendRecord>>,
    fail_on: Option<usize>,
}

impl RecordingBot {
    fn new(fail_on: Option<usize>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_on,
        }
    }

    fn records(&self) -> Vec<SendRecord> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_chunk(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<SentMessage> {
        let mut sent = self.sent.lock().unwrap();
        let attempt = sent.len() + 1;
        sent.push(SendRecord {
            chat_id,
            len: text.chars().count(),
            reply_to,
        });
        if self.fail_on == Some(attempt) {
            return Err(DbotError::Bot(format!("chunk {} rejected", attempt)));
        }
        Ok(SentMessage {
            chat_id,
            message_id: attempt as i32,
        })
    }
}

/// **Test: 9000 characters are sent as 4096, 4096, 808, in order, all replying to the same message.**
#[tokio::test]
async fn test_send_text_splits_long_message() {
    let bot = RecordingBot::new(None);
    let text = "x".repeat(9000);

    let sent = bot.send_text(42, &text, Some(7)).await.unwrap();

    assert_eq!(sent.len(), 3);
    assert_eq!(
        sent.iter().map(|m| m.message_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    let records = bot.records();
    assert_eq!(
        records.iter().map(|r| r.len).collect::<Vec<_>>(),
        vec![4096, 4096, 808]
    );
    assert!(records.iter().all(|r| r.chat_id == 42 && r.reply_to == Some(7)));
}

/// **Test: failure on the 2nd chunk returns the error and the 3rd chunk is never attempted.**
#[tokio::test]
async fn test_send_text_aborts_on_failed_chunk() {
    let bot = RecordingBot::new(Some(2));
    let text = "x".repeat(9000);

    let result = bot.send_text(42, &text, None).await;

    match result {
        Err(DbotError::Bot(msg)) => assert_eq!(msg, "chunk 2 rejected"),
        other => panic!("expected Bot error, got {:?}", other),
    }
    assert_eq!(bot.records().len(), 2);
}

/// **Test: short text is one chunk; empty text sends nothing.**
#[tokio::test]
async fn test_send_text_short_and_empty() {
    let bot = RecordingBot::new(None);

    let sent = bot.send_text(1, "hello", None).await.unwrap();
    assert_eq!(sent.len(), 1);

    let sent = bot.send_text(1, "", None).await.unwrap();
    assert!(sent.is_empty());
    assert_eq!(bot.records().len(), 1);
}
