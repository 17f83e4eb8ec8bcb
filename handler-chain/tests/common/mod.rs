//! Shared fixtures for handler-chain integration tests: a recording mock [`Bot`], update
//! builders and handlers that record their execution order.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dbot_core::{Bot, BotInfo, Chat, DbotError, HandlerError, Result, SentMessage, Update, User};
use handler_chain::{Context, Handler};
use tokio::sync::mpsc;

pub const BOT_USERNAME: &str = "test_bot";

/// One recorded `send_chunk` call.
#[derive(Debug, Clone)]
pub struct SendRecord {
    pub chat_id: i64,
    pub text: String,
    pub reply_to: Option<i32>,
}

/// Mock Bot that forwards every sent chunk to a channel; optionally fails every send.
pub struct MockBot {
    sent_tx: mpsc::UnboundedSender<SendRecord>,
    fail: bool,
}

impl MockBot {
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<SendRecord>) {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        (Arc::new(Self { sent_tx, fail: false }), sent_rx)
    }

    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<SendRecord>) {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        (Arc::new(Self { sent_tx, fail: true }), sent_rx)
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_chunk(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<SentMessage> {
        let _ = self.sent_tx.send(SendRecord {
            chat_id,
            text: text.to_string(),
            reply_to,
        });
        if self.fail {
            return Err(DbotError::Bot("send rejected".to_string()));
        }
        Ok(SentMessage {
            chat_id,
            message_id: 1000,
        })
    }
}

pub fn bot_info() -> BotInfo {
    BotInfo {
        id: 1,
        username: BOT_USERNAME.to_string(),
    }
}

pub fn create_update(chat_id: i64, message_id: i32, text: &str) -> Update {
    Update::new(
        message_id,
        Chat {
            id: chat_id,
            chat_type: "group".to_string(),
        },
        Some(User {
            id: 123,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        }),
        text,
    )
}

pub type Order = Arc<Mutex<Vec<String>>>;

pub fn new_order() -> Order {
    Arc::new(Mutex::new(Vec::new()))
}

/// Records its name, then continues the chain.
pub struct Step {
    pub name: &'static str,
    pub order: Order,
}

#[async_trait]
impl Handler for Step {
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        self.order.lock().unwrap().push(self.name.to_string());
        ctx.next().await
    }
}

/// Records its name and ends the chain successfully.
pub struct Terminal {
    pub name: &'static str,
    pub order: Order,
}

#[async_trait]
impl Handler for Terminal {
    async fn handle(&self, _ctx: &mut Context) -> Result<()> {
        self.order.lock().unwrap().push(self.name.to_string());
        Ok(())
    }
}

/// Records its name and fails.
pub struct Failing {
    pub name: &'static str,
    pub order: Order,
}

#[async_trait]
impl Handler for Failing {
    async fn handle(&self, _ctx: &mut Context) -> Result<()> {
        self.order.lock().unwrap().push(self.name.to_string());
        Err(HandlerError::custom(format!("{} failed", self.name)).into())
    }
}

pub fn step(name: &'static str, order: &Order) -> Arc<dyn Handler> {
    Arc::new(Step {
        name,
        order: Arc::clone(order),
    })
}

pub fn terminal(name: &'static str, order: &Order) -> Arc<dyn Handler> {
    Arc::new(Terminal {
        name,
        order: Arc::clone(order),
    })
}

pub fn failing(name: &'static str, order: &Order) -> Arc<dyn Handler> {
    Arc::new(Failing {
        name,
        order: Arc::clone(order),
    })
}
