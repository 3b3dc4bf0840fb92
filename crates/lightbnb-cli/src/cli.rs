use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lightbnb_db_postgres::DEFAULT_RESERVATION_LIMIT;
use lightbnb_search::{DEFAULT_LIMIT, SearchCriteria};
use time::Date;
use time::macros::format_description;

#[derive(Parser)]
#[command(name = "lightbnb")]
#[command(about = "LightBnB data access: users, properties and reservations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file (defaults to lightbnb.toml)
    #[arg(short, long, global = true, env = "LIGHTBNB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL (overrides the configuration file)
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a user by email or id
    User(UserArgs),
    /// Register a new user
    AddUser(AddUserArgs),
    /// Search properties
    Search(SearchArgs),
    /// List a guest's past reservations
    Reservations(ReservationsArgs),
    /// Add a property from a JSON document
    AddProperty(AddPropertyArgs),
    /// Book a property for a guest
    AddReservation(AddReservationArgs),
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
pub struct UserArgs {
    /// Email address (case-insensitive)
    #[arg(long)]
    pub email: Option<String>,
    /// User id
    #[arg(long)]
    pub id: Option<i32>,
}

#[derive(clap::Args)]
pub struct AddUserArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Stored as given
    #[arg(long, env = "LIGHTBNB_PASSWORD")]
    pub password: String,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Part of the city name (case-insensitive)
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub owner_id: Option<i32>,
    /// Minimum nightly price in dollars (only applied with --max-price)
    #[arg(long)]
    pub min_price: Option<i64>,
    /// Maximum nightly price in dollars (only applied with --min-price)
    #[arg(long)]
    pub max_price: Option<i64>,
    /// Minimum average review rating
    #[arg(long)]
    pub min_rating: Option<f64>,
    /// Maximum number of listings
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
}

impl From<&SearchArgs> for SearchCriteria {
    fn from(args: &SearchArgs) -> Self {
        SearchCriteria {
            city: args.city.clone(),
            owner_id: args.owner_id,
            minimum_price_per_night: args.min_price,
            maximum_price_per_night: args.max_price,
            minimum_rating: args.min_rating,
        }
    }
}

#[derive(clap::Args)]
pub struct ReservationsArgs {
    #[arg(long)]
    pub guest_id: i32,
    /// Maximum number of reservations
    #[arg(long, default_value_t = DEFAULT_RESERVATION_LIMIT)]
    pub limit: u32,
}

#[derive(clap::Args)]
pub struct AddPropertyArgs {
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct AddReservationArgs {
    #[arg(long)]
    pub guest_id: i32,
    #[arg(long)]
    pub property_id: i32,
    /// First night, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub start_date: Date,
    /// Checkout day, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub end_date: Date,
}

fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
