use anyhow::Result;
use colored::Colorize;
use lightbnb_db_postgres::{PropertyListing, PropertyRow, ReservationListing, ReservationRow, UserRow};
use lightbnb_search::dollars_from_cents;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn print_not_found(msg: &str) {
    eprintln!("{} {}", "∅".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn price(cents: i32) -> String {
    format!("${:.2}", dollars_from_cents(i64::from(cents)))
}

fn rating(average: Option<f64>) -> String {
    average.map_or_else(|| "-".to_string(), |r| format!("{r:.2}"))
}

fn render(builder: Builder) -> String {
    builder.build().with(Style::rounded()).to_string()
}

pub fn user_table(user: &UserRow) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Email"]);
    builder.push_record([user.id.to_string(), user.name.clone(), user.email.clone()]);
    render(builder)
}

pub fn property_table(property: &PropertyRow) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Owner", "Title", "City", "Price/night"]);
    builder.push_record([
        property.id.to_string(),
        property.owner_id.to_string(),
        property.title.clone(),
        property.city.clone(),
        price(property.cost_per_night),
    ]);
    render(builder)
}

pub fn listings_table(listings: &[PropertyListing]) -> String {
    if listings.is_empty() {
        return "No properties found.".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Title", "City", "Price/night", "Rating"]);
    for listing in listings {
        let p = &listing.property;
        builder.push_record([
            p.id.to_string(),
            p.title.clone(),
            p.city.clone(),
            price(p.cost_per_night),
            rating(listing.average_rating),
        ]);
    }
    render(builder)
}

pub fn reservation_table(reservation: &ReservationRow) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Guest", "Property", "Start", "End"]);
    builder.push_record([
        reservation.id.to_string(),
        reservation.guest_id.to_string(),
        reservation.property_id.to_string(),
        reservation.start_date.to_string(),
        reservation.end_date.to_string(),
    ]);
    render(builder)
}

pub fn reservations_table(listings: &[ReservationListing]) -> String {
    if listings.is_empty() {
        return "No past reservations.".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Property", "City", "Start", "End", "Price/night", "Rating"]);
    for listing in listings {
        let r = &listing.reservation;
        builder.push_record([
            r.id.to_string(),
            listing.property.title.clone(),
            listing.property.city.clone(),
            r.start_date.to_string(),
            r.end_date.to_string(),
            price(listing.property.cost_per_night),
            rating(listing.average_rating),
        ]);
    }
    render(builder)
}
