use anyhow::{Context, Result};
use colored::Colorize;
use lightbnb_db_postgres::{NewReservation, PostgresLightbnbStorage};

use super::Outcome;
use crate::cli::{AddReservationArgs, OutputFormat, ReservationsArgs};
use crate::output::{print_json, print_success, reservation_table, reservations_table};

pub async fn list_past(
    storage: &PostgresLightbnbStorage,
    args: &ReservationsArgs,
    format: OutputFormat,
) -> Result<Outcome> {
    let listings = storage
        .reservations()
        .list_past_for_guest(args.guest_id, args.limit)
        .await?;

    match format {
        OutputFormat::Json => print_json(&listings)?,
        OutputFormat::Table => println!("{}", reservations_table(&listings)),
    }
    Ok(Outcome::Done)
}

pub async fn add(
    storage: &PostgresLightbnbStorage,
    args: &AddReservationArgs,
    format: OutputFormat,
) -> Result<Outcome> {
    let reservation = storage
        .reservations()
        .create(&NewReservation {
            guest_id: args.guest_id,
            property_id: args.property_id,
            start_date: args.start_date,
            end_date: args.end_date,
        })
        .await
        .context("Failed to add reservation")?;

    print_success(&format!(
        "Reserved property {} from {} to {}",
        reservation.property_id.to_string().cyan(),
        reservation.start_date,
        reservation.end_date
    ));
    match format {
        OutputFormat::Json => print_json(&reservation)?,
        OutputFormat::Table => println!("{}", reservation_table(&reservation)),
    }
    Ok(Outcome::Done)
}
