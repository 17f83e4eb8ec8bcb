//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dbot_telegram::TelegramConfig;

#[derive(Parser)]
#[command(name = "dbot")]
#[command(about = "Telegram command dispatch bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        /// Log file path; overrides LOG_FILE.
        #[arg(long)]
        log_file: Option<String>,
    },
}

/// Load TelegramConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<TelegramConfig> {
    let config = TelegramConfig::load(token)?;
    config.validate()?;
    Ok(config)
}
