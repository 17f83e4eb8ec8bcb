//! Dispatch pipeline: filter → route → context → worker pool → error sink.
//!
//! Routing decisions are made in arrival order by the caller of [`Dispatcher::dispatch`]; chain
//! executions then run concurrently on the [`WorkerPool`] and may complete in any order.

use std::sync::Arc;

use dbot_core::{Bot, BotInfo, Result, Update};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::DispatchConfig;
use crate::context::Context;
use crate::error_handler::{DefaultErrorHandler, ErrorHandler};
use crate::filter::{Filter, FilterDecision};
use crate::pool::WorkerPool;
use crate::router::Router;

/// What happened to one dispatched update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A chain was submitted to the worker pool.
    Submitted { request_id: String },
    /// The filter rejected the update.
    Filtered(FilterDecision),
    /// No chain matched; the update was dropped without error.
    NoChain,
}

pub struct Dispatcher {
    filter: Filter,
    router: Router,
    pool: WorkerPool,
    error_handler: Arc<dyn ErrorHandler>,
    bot: Arc<dyn Bot>,
    bot_info: Arc<BotInfo>,
    allow_normal_messages: bool,
    root: CancellationToken,
}

impl Dispatcher {
    /// Builds a dispatcher with the [`DefaultErrorHandler`] and a fresh root cancellation token.
    pub fn new(
        config: &DispatchConfig,
        router: Router,
        bot: Arc<dyn Bot>,
        bot_info: BotInfo,
    ) -> Self {
        Self {
            filter: Filter::new(config, bot_info.username.clone()),
            router,
            pool: WorkerPool::new(config.effective_max_concurrency()),
            error_handler: Arc::new(DefaultErrorHandler::new()),
            bot,
            bot_info: Arc::new(bot_info),
            allow_normal_messages: config.allow_normal_messages,
            root: CancellationToken::new(),
        }
    }

    /// Replaces the error sink.
    pub fn with_error_handler(mut self, error_handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = error_handler;
        self
    }

    /// Uses `root` as the parent of every context's cancellation token.
    pub fn with_cancellation_token(mut self, root: CancellationToken) -> Self {
        self.root = root;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.root
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn bot_info(&self) -> &BotInfo {
        &self.bot_info
    }

    /// Filters and routes `update`, then submits its chain to the pool.
    ///
    /// Waits while the pool is full. The returned outcome only says whether a chain was
    /// submitted; the chain's own result goes to the error sink.
    pub async fn dispatch(&self, update: Update) -> Result<DispatchOutcome> {
        let decision = self.filter.check(&update);
        if !decision.is_admitted() {
            debug!(
                chat_id = update.chat.id,
                message_id = update.message_id,
                decision = ?decision,
                "update filtered"
            );
            return Ok(DispatchOutcome::Filtered(decision));
        }

        let chain = match self
            .router
            .resolve(update.command_name(), self.allow_normal_messages)
        {
            Some(chain) => chain,
            None => return Ok(DispatchOutcome::NoChain),
        };

        let mut ctx = Context::new(
            update,
            chain,
            Arc::clone(&self.bot),
            Arc::clone(&self.bot_info),
            self.root.child_token(),
        );
        let request_id = ctx.request_id().to_string();
        let error_handler = Arc::clone(&self.error_handler);

        self.pool
            .submit(async move {
                info!(
                    request_id = %ctx.request_id(),
                    chat_id = ctx.channel_id(),
                    message_id = ctx.message_id(),
                    command = %ctx.command(),
                    chain_len = ctx.chain_len(),
                    "step: handler chain started"
                );
                match ctx.run().await {
                    Ok(()) => {
                        info!(
                            request_id = %ctx.request_id(),
                            handlers_run = ctx.cursor(),
                            "step: handler chain finished"
                        );
                    }
                    Err(e) => {
                        warn!(
                            request_id = %ctx.request_id(),
                            chat_id = ctx.channel_id(),
                            handlers_run = ctx.cursor(),
                            error = %e,
                            "step: handler chain failed"
                        );
                        error_handler.handle(&ctx, &e).await;
                    }
                }
            })
            .await?;

        Ok(DispatchOutcome::Submitted { request_id })
    }

    /// Dispatches updates from `updates` in arrival order until the channel closes or the root
    /// token is cancelled. Errors from a single dispatch are logged and do not stop the loop.
    #[instrument(skip(self, updates), fields(bot = %self.bot_info.username))]
    pub async fn listen(&self, mut updates: mpsc::Receiver<Update>) -> Result<()> {
        info!("dispatcher listening for updates");
        loop {
            let update = tokio::select! {
                _ = self.root.cancelled() => {
                    info!("dispatcher cancelled");
                    break;
                }
                update = updates.recv() => match update {
                    Some(update) => update,
                    None => {
                        info!("update stream closed");
                        break;
                    }
                },
            };
            if let Err(e) = self.dispatch(update).await {
                warn!(error = %e, "dispatch failed");
            }
        }
        Ok(())
    }

    /// Cancels every in-flight context and waits for running chains to return.
    pub async fn shutdown(&self) {
        self.root.cancel();
        self.pool.wait_idle().await;
        info!("dispatcher shut down");
    }
}
