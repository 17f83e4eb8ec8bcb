//! Per-message execution context and the `next()` continuation protocol.
//!
//! One [`Context`] is created for each admitted update and dropped when its chain finishes. It
//! owns the chain cursor, an untyped value store shared by the handlers of that chain, snapshots
//! of the message identifiers and a cancellation token derived from the dispatcher's root token.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use dbot_core::{split_arguments, Bot, BotInfo, HandlerError, Result, SentMessage, Update, User};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::handler::HandlerChain;

/// Execution state of a chain, derived from the cursor and the recorded outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// No handler has run yet.
    Pending,
    /// At least one handler was entered and the chain has not returned.
    Running,
    /// The chain returned without error (possibly short-circuited by a middleware).
    Completed,
    /// The chain returned an error.
    Failed,
}

pub struct Context {
    update: Update,
    bot: Arc<dyn Bot>,
    bot_info: Arc<BotInfo>,
    request_id: String,
    args: Vec<String>,
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
    chain: HandlerChain,
    cursor: usize,
    cancel: CancellationToken,
    outcome: Option<bool>,
}

impl Context {
    pub fn new(
        update: Update,
        chain: HandlerChain,
        bot: Arc<dyn Bot>,
        bot_info: Arc<BotInfo>,
        cancel: CancellationToken,
    ) -> Self {
        let args = split_arguments(&update.arguments);
        Self {
            update,
            bot,
            bot_info,
            request_id: Uuid::new_v4().to_string(),
            args,
            values: HashMap::new(),
            chain,
            cursor: 0,
            cancel,
            outcome: None,
        }
    }

    /// Runs the handler at the cursor and advances the cursor.
    ///
    /// Returns the handler's result unchanged. Fails with [`HandlerError::OutOfRange`] when every
    /// handler of the chain has already been entered.
    pub async fn next(&mut self) -> Result<()> {
        let handler = match self.chain.get(self.cursor) {
            Some(handler) => Arc::clone(handler),
            None => {
                return Err(HandlerError::OutOfRange {
                    cursor: self.cursor,
                    len: self.chain.len(),
                }
                .into())
            }
        };
        self.cursor += 1;
        handler.handle(self).await
    }

    /// Entry point used by the dispatcher: runs the chain from the first handler and records the
    /// outcome for [`Context::state`].
    pub async fn run(&mut self) -> Result<()> {
        let result = self.next().await;
        self.outcome = Some(result.is_ok());
        result
    }

    pub fn state(&self) -> ChainState {
        match self.outcome {
            Some(true) => ChainState::Completed,
            Some(false) => ChainState::Failed,
            None if self.cursor == 0 => ChainState::Pending,
            None => ChainState::Running,
        }
    }

    /// Number of handlers entered so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    // --- values ---

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Returns the value under `key` if present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Removes the value under `key`. A value of a different type stays in place.
    pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.values.get(key).is_some_and(|v| v.is::<T>()) {
            return None;
        }
        self.values
            .remove(key)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    // --- message snapshot ---

    pub fn message(&self) -> &Update {
        &self.update
    }

    pub fn message_id(&self) -> i32 {
        self.update.message_id
    }

    pub fn channel_id(&self) -> i64 {
        self.update.chat.id
    }

    pub fn sender(&self) -> Option<&User> {
        self.update.sender.as_ref()
    }

    /// Sender id, or 0 when the message has no sender (e.g. channel posts).
    pub fn sender_id(&self) -> i64 {
        self.update.sender.as_ref().map(|u| u.id).unwrap_or(0)
    }

    /// Sender's username without `@`, falling back to first and last name; empty without sender.
    pub fn sender_name(&self) -> String {
        self.update
            .sender
            .as_ref()
            .map(User::display_name)
            .unwrap_or_default()
    }

    pub fn is_command(&self) -> bool {
        self.update.is_command()
    }

    pub fn command(&self) -> &str {
        self.update.command_name()
    }

    /// Command arguments split on whitespace.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    // --- collaborators ---

    pub fn bot(&self) -> &Arc<dyn Bot> {
        &self.bot
    }

    pub fn bot_info(&self) -> &BotInfo {
        &self.bot_info
    }

    /// Sends `text` to the originating chat as a reply to the originating message.
    pub async fn reply(&self, text: &str) -> Result<Vec<SentMessage>> {
        self.bot
            .send_text(self.channel_id(), text, Some(self.message_id()))
            .await
    }

    /// Token cancelled when the dispatcher shuts down. Handlers blocked on I/O should select on
    /// [`CancellationToken::cancelled`].
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("chat_id", &self.update.chat.id)
            .field("message_id", &self.update.message_id)
            .field("cursor", &self.cursor)
            .field("chain_len", &self.chain.len())
            .finish_non_exhaustive()
    }
}
