//! # dbot-cli
//!
//! CLI foundation: argument parsing, config loading and the demo command set wired by `dbot run`.

pub mod cli;
pub mod handlers;

pub use cli::{load_config, Cli, Commands};
pub use dbot_telegram::TelegramConfig;
pub use handlers::{build_router, EchoHandler, IdHandler, StartHandler};
