pub mod properties;
pub mod reservations;
pub mod users;

use anyhow::Result;
use lightbnb_db_postgres::PostgresLightbnbStorage;

use crate::cli::{Commands, OutputFormat};

/// Result of a command that ran to completion.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The requested record does not exist.
    NotFound(String),
}

pub async fn dispatch(
    storage: &PostgresLightbnbStorage,
    command: &Commands,
    format: OutputFormat,
) -> Result<Outcome> {
    match command {
        Commands::User(args) => users::show(storage, args, format).await,
        Commands::AddUser(args) => users::add(storage, args, format).await,
        Commands::Search(args) => properties::search(storage, args, format).await,
        Commands::AddProperty(args) => properties::add(storage, args, format).await,
        Commands::Reservations(args) => reservations::list_past(storage, args, format).await,
        Commands::AddReservation(args) => reservations::add(storage, args, format).await,
    }
}
