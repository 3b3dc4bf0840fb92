//! Conversions between whole currency units and stored cents.
//!
//! Costs are stored as integer cents. Search criteria are expressed in whole
//! dollars and converted exactly once, when the statement is built.

/// Converts whole dollars to cents, saturating at the `i64` bounds.
#[must_use]
pub fn cents_from_dollars(dollars: i64) -> i64 {
    dollars.saturating_mul(100)
}

/// Converts stored cents to a dollar amount for display.
#[must_use]
pub fn dollars_from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}
