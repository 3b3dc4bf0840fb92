mod cli;
mod commands;
mod config;
mod observability;
mod output;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use lightbnb_db_postgres::{PostgresLightbnbStorage, mask_password};

use cli::Cli;
use commands::Outcome;
use config::loader::load_config;
use output::{print_error, print_not_found};

const EXIT_NOT_FOUND: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so env-backed flags see its values
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::NotFound(message)) => {
            print_not_found(&message);
            ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(e) => {
            print_error(&format!("{e:#}"));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: &Cli) -> Result<Outcome> {
    let cfg = load_config(cli.config.as_deref())?.with_database_url(cli.database_url.clone());
    cfg.validate()?;

    observability::init_tracing_with_level(&cfg.logging.level);
    tracing::debug!(url = %mask_password(&cfg.database.url), "Configuration loaded");

    let storage = PostgresLightbnbStorage::connect(&cfg.database)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_password(&cfg.database.url)))?;

    let outcome = commands::dispatch(&storage, &cli.command, cli.format.unwrap_or_default()).await;

    storage.close().await;
    outcome
}
