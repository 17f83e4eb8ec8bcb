//! Error sink: invoked once for every chain that ends with an error.

use async_trait::async_trait;
use dbot_core::DbotError;
use tracing::error;

use crate::context::Context;

#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(&self, ctx: &Context, err: &DbotError);
}

/// Replies to the failing message with the error text. A failed reply is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl DefaultErrorHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn format_error(err: &DbotError) -> String {
        format!("error when process message: ```{}```", err)
    }
}

#[async_trait]
impl ErrorHandler for DefaultErrorHandler {
    async fn handle(&self, ctx: &Context, err: &DbotError) {
        let text = Self::format_error(err);
        if let Err(e) = ctx.reply(&text).await {
            error!(
                request_id = %ctx.request_id(),
                chat_id = ctx.channel_id(),
                message_id = ctx.message_id(),
                error = %e,
                "cannot send error message"
            );
        }
    }
}
