mod cli;
mod config;
pub mod tui;

use anyhow::Result;
use clap::Parser; // needed for Cli::parse()
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::commands::run_cli;
use cli::opts::{Cli, Command};
use config::AppConfig;

fn main() -> Result<()> {
    let args = Cli::parse();
    let cfg = AppConfig::load(args.config.as_deref())?;

    // Log lines would tear the alternate screen, so the TUI stays quiet
    // unless RUST_LOG asks otherwise.
    let fallback = match args.cmd {
        Command::Tui => "off".to_string(),
        _ => cfg.log_filter().to_string(),
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run_cli(args, cfg)
}
