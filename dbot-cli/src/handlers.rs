//! Demo command set for `dbot run`: /start, /echo, /id and an echo fallback for plain text.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{RegistrationError, Result};
use handler_chain::{handler_fn, Context, Handler, Registry, Router};
use middleware::LoggingMiddleware;
use teloxide::utils::html;

/// Greets the sender.
pub struct StartHandler;

#[async_trait]
impl Handler for StartHandler {
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        let text = format!(
            "Hello, {}! I am @{}. Try /echo followed by some text, or /id.",
            html::escape(&ctx.sender_name()),
            ctx.bot_info().username
        );
        ctx.reply(&text).await?;
        Ok(())
    }
}

/// Replies with the command arguments, HTML-escaped.
pub struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        let text = if ctx.args().is_empty() {
            "usage: /echo TEXT".to_string()
        } else {
            html::escape(&ctx.args().join(" "))
        };
        ctx.reply(&text).await?;
        Ok(())
    }
}

/// Replies with the chat id and sender id.
pub struct IdHandler;

#[async_trait]
impl Handler for IdHandler {
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        let text = format!("chat id: {}\nuser id: {}", ctx.channel_id(), ctx.sender_id());
        ctx.reply(&text).await?;
        Ok(())
    }
}

/// LoggingMiddleware in front of the demo commands; plain text is echoed back when normal
/// messages are allowed.
pub fn build_router() -> std::result::Result<Router, RegistrationError> {
    let mut registry = Registry::new();
    registry.use_middleware(Arc::new(LoggingMiddleware));
    registry
        .register_handler("start", vec![Arc::new(StartHandler)])?
        .register_handler("echo", vec![Arc::new(EchoHandler)])?
        .register_handler("id", vec![Arc::new(IdHandler)])?;
    registry.set_default_handler(vec![handler_fn(|ctx| {
        Box::pin(async move {
            let text = html::escape(&ctx.message().text);
            ctx.reply(&text).await?;
            Ok(())
        })
    })]);
    Ok(registry.build())
}
