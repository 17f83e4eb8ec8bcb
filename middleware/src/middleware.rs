use std::time::Instant;

use async_trait::async_trait;
use dbot_core::{HandlerError, Result};
use handler_chain::{Context, Handler};
use tracing::{debug, error, info, instrument};

/// Logs each message before the rest of the chain runs and the outcome after; always continues.
pub struct LoggingMiddleware;

#[async_trait]
impl Handler for LoggingMiddleware {
    #[instrument(skip(self, ctx))]
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        info!(
            request_id = %ctx.request_id(),
            user_id = ctx.sender_id(),
            username = %ctx.sender_name(),
            chat_id = ctx.channel_id(),
            message_content = %ctx.message().text,
            "Received message"
        );
        let started = Instant::now();
        let result = ctx.next().await;
        debug!(
            message_id = ctx.message_id(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Processed message"
        );
        result
    }
}

/// Fails the chain with [`HandlerError::Unauthorized`] unless the sender is in the allowlist.
pub struct AuthMiddleware {
    allowed_users: Vec<i64>,
}

impl AuthMiddleware {
    pub fn new(allowed_users: Vec<i64>) -> Self {
        Self { allowed_users }
    }
}

#[async_trait]
impl Handler for AuthMiddleware {
    #[instrument(skip(self, ctx))]
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        let user_id = ctx.sender_id();
        if self.allowed_users.contains(&user_id) {
            info!(user_id = user_id, "User authorized");
            ctx.next().await
        } else {
            error!(user_id = user_id, "Unauthorized access attempt");
            Err(HandlerError::Unauthorized.into())
        }
    }
}
