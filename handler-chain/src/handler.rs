//! Handler trait, closure handlers and the immutable per-dispatch [`HandlerChain`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::Result;

use crate::context::Context;

/// Boxed, sendable future returned by closure handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A step in a handler chain.
///
/// A handler that wants the rest of the chain to run must call [`Context::next`] itself and
/// return its result; returning without calling it short-circuits the chain. Middlewares use
/// this to reject a message.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context) -> Result<()>;
}

/// Adapts a closure into a [`Handler`]. Built with [`handler_fn`].
pub struct HandlerFn<F>(F);

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: for<'c> Fn(&'c mut Context) -> BoxFuture<'c, Result<()>> + Send + Sync,
{
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        (self.0)(ctx).await
    }
}

/// Wraps a closure as a shareable handler.
///
/// ```rust,ignore
/// let greet = handler_fn(|ctx| Box::pin(async move {
///     ctx.reply("hello").await?;
///     Ok(())
/// }));
/// ```
pub fn handler_fn<F>(f: F) -> Arc<dyn Handler>
where
    F: for<'c> Fn(&'c mut Context) -> BoxFuture<'c, Result<()>> + Send + Sync + 'static,
{
    Arc::new(HandlerFn(f))
}

/// Ordered handlers resolved for one update: middlewares first, then the command handlers.
/// Immutable once built.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self { handlers }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn Handler>> {
        self.handlers.get(index)
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .finish()
    }
}
