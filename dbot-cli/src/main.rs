//! dbot CLI: run the Telegram bot. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use dbot_cli::{build_router, load_config, Cli, Commands};
use dbot_core::init_tracing;
use dbot_telegram::run_polling;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, log_file } => {
            let mut config = load_config(token)?;
            if log_file.is_some() {
                config.log_file = log_file;
            }
            init_tracing(config.log_file.as_deref())?;
            let router = build_router()?;
            run_polling(config, router, None, CancellationToken::new()).await
        }
    }
}
