//! # dbot-telegram
//!
//! Telegram transport for the dispatch framework: adapters from teloxide types, the
//! [`dbot_core::Bot`] implementation, env config and the long-polling runner.
//! Handles only Telegram connectivity; filtering, routing and chain execution live in handler-chain.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::{parse_parse_mode, TelegramConfig, DEFAULT_POLL_TIMEOUT_SECS};
pub use runner::{build_teloxide_bot, run_polling, run_polling_with_bot};
