#![allow(non_snake_case)]

use std::env;

use anyhow::Context;
use clap::Parser;
use serviceCalendar::cli::{Cli, Commands};
use serviceCalendar::config::{AppConfig, Settings};
use serviceCalendar::runtime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    runtime::init_tracing(cli.verbose)?;

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path)?,
        Err(_) => AppConfig::default(),
    };
    let settings = Settings::from_config(&config).context("invalid configuration")?;
    tracing::info!(api = %settings.api_base_url, "starting service calendar");

    runtime::run(settings, cli.command.unwrap_or(Commands::Watch)).await
}
