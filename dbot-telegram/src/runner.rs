//! Long-polling runner: fetches updates with getUpdates, converts text messages to core
//! [`Update`](dbot_core::Update)s and feeds them to the [`Dispatcher`] in arrival order.
//! Stops on Ctrl-C or when the shutdown token is cancelled, then drains in-flight chains.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dbot_core::BotInfo;
use handler_chain::{DispatchOutcome, Dispatcher, ErrorHandler, Router};
use teloxide::{
    prelude::*,
    types::{AllowedUpdate, UpdateKind},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::TelegramMessageWrapper;
use crate::bot_adapter::TelegramBotAdapter;
use crate::config::TelegramConfig;

const RETRY_DELAY_MIN: Duration = Duration::from_secs(1);
const RETRY_DELAY_MAX: Duration = Duration::from_secs(30);

/// Builds the teloxide Bot: HTTP timeout above the long-poll timeout, optional custom API URL.
pub fn build_teloxide_bot(config: &TelegramConfig) -> Result<teloxide::Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(u64::from(config.poll_timeout_secs) + 15))
        .build()?;
    let bot = teloxide::Bot::with_client(config.bot_token.clone(), client);
    match config.telegram_api_url {
        Some(ref url_str) => {
            let url = reqwest::Url::parse(url_str).map_err(|e| {
                anyhow::anyhow!("Invalid TELEGRAM_API_URL {}: {}", url_str, e)
            })?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Main entry: validates config, builds the bot with [`build_teloxide_bot`], then runs
/// [`run_polling_with_bot`].
#[instrument(skip(config, router, error_handler, shutdown))]
pub async fn run_polling(
    config: TelegramConfig,
    router: Router,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    shutdown: CancellationToken,
) -> Result<()> {
    config.validate()?;
    let bot = build_teloxide_bot(&config)?;
    run_polling_with_bot(bot, config, router, error_handler, shutdown).await
}

/// Long-polls with a caller-built teloxide Bot until shutdown. The token and API URL in `config`
/// are ignored; the bot's own client settings are used as given.
///
/// Fails when the bot identity cannot be fetched. Once polling, transport errors are logged and
/// retried with backoff. `error_handler` replaces the default error sink when given.
#[instrument(skip(bot, config, router, error_handler, shutdown))]
pub async fn run_polling_with_bot(
    bot: teloxide::Bot,
    config: TelegramConfig,
    router: Router,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    shutdown: CancellationToken,
) -> Result<()> {
    let me = bot.get_me().await.map_err(|e| {
        error!(error = %e, "Failed to fetch bot identity");
        anyhow::anyhow!("get_me failed: {}", e)
    })?;
    let username = me
        .user
        .username
        .clone()
        .ok_or_else(|| anyhow::anyhow!("bot account has no username"))?;
    let bot_info = BotInfo {
        id: me.user.id.0 as i64,
        username,
    };

    if let Err(e) = bot.delete_webhook().send().await {
        warn!(error = %e, "Failed to clear webhook; long polling may be rejected");
    }

    let adapter = TelegramBotAdapter::new(bot.clone()).with_parse_mode(config.parse_mode);
    let mut dispatcher = Dispatcher::new(&config.dispatch, router, Arc::new(adapter), bot_info)
        .with_cancellation_token(shutdown.clone());
    if let Some(handler) = error_handler {
        dispatcher = dispatcher.with_error_handler(handler);
    }

    info!(
        username = %dispatcher.bot_info().username,
        commands = ?dispatcher.router().commands(),
        max_concurrency = dispatcher.pool().max_concurrency(),
        "Bot started successfully"
    );

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = signal_token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Ctrl-C received, shutting down"),
                    Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
                }
                signal_token.cancel();
            }
        }
    });

    poll_updates(&bot, &dispatcher, &config, &shutdown).await;

    dispatcher.shutdown().await;
    info!("Bot stopped");
    Ok(())
}

async fn poll_updates(
    bot: &teloxide::Bot,
    dispatcher: &Dispatcher,
    config: &TelegramConfig,
    shutdown: &CancellationToken,
) {
    info!(timeout_secs = config.poll_timeout_secs, "starting telegram polling loop");
    let mut offset: i32 = 0;
    let mut retry_delay = RETRY_DELAY_MIN;

    loop {
        let result = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = bot
                .get_updates()
                .offset(offset)
                .timeout(config.poll_timeout_secs)
                .allowed_updates(vec![AllowedUpdate::Message])
                .send() => result,
        };

        let updates = match result {
            Ok(updates) => {
                retry_delay = RETRY_DELAY_MIN;
                updates
            }
            Err(e) => {
                warn!(error = %e, retry_in_secs = retry_delay.as_secs(), "getUpdates failed");
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(retry_delay) => {}
                }
                retry_delay = (retry_delay * 2).min(RETRY_DELAY_MAX);
                continue;
            }
        };

        for update in updates {
            offset = update.id.as_offset();
            if config.debug {
                debug!(update = ?update, "raw telegram update");
            }
            let msg = match update.kind {
                UpdateKind::Message(msg) => msg,
                other => {
                    debug!("ignoring non-message update: {:?}", other);
                    continue;
                }
            };
            let Some(core_update) = TelegramMessageWrapper(&msg).to_update() else {
                debug!(chat_id = msg.chat.id.0, "Received non-text message");
                continue;
            };

            match dispatcher.dispatch(core_update).await {
                Ok(DispatchOutcome::Submitted { request_id }) => {
                    debug!(request_id = %request_id, chat_id = msg.chat.id.0, "update dispatched");
                }
                Ok(outcome) => {
                    debug!(chat_id = msg.chat.id.0, outcome = ?outcome, "update dropped");
                }
                Err(e) => {
                    warn!(error = %e, chat_id = msg.chat.id.0, "dispatch failed");
                }
            }
        }
    }
    info!("telegram polling stopped");
}
