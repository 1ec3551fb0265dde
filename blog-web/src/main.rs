use anyhow::{Context, Result};
use clap::Parser;

mod application;
mod cli;
mod data;
mod domain;
mod infrastructure;
mod markup;
mod presentation;
mod server;

use cli::{Cli, Command};
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let command = cli.command.unwrap_or(Command::Serve);
    cli::execute(command, &settings, pool)
        .await
        .context("command failed")
}
