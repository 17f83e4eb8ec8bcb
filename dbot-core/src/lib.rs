//! # dbot-core
//!
//! Core types and traits for the Telegram dispatch framework: [`Bot`], [`Update`], user and chat
//! types, command parsing, error types and tracing initialization. Transport-agnostic; used by
//! handler-chain and dbot-telegram.

pub mod bot;
pub mod command;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{split_text, Bot, MAX_MESSAGE_LEN};
pub use command::{parse_command, split_arguments, CommandToken};
pub use error::{DbotError, HandlerError, RegistrationError, Result};
pub use logger::init_tracing;
pub use types::{BotInfo, Chat, SentMessage, Update, User};
