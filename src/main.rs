use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use m2sh::cli::prompt::TerminalPrompt;
use m2sh::cli::{session, Cli};
use m2sh::{Config, MattermostClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "m2sh=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    Cli::parse();

    // Load configuration from INI file and environment variables
    let config = Config::load().context("Error loading configuration")?;
    config.validate()?;

    let client = MattermostClient::new(&config.url)?;
    let mut prompt = TerminalPrompt;
    let mut stdout = io::stdout();

    session::run(&client, config, &mut prompt, &mut stdout).await?;
    Ok(())
}
