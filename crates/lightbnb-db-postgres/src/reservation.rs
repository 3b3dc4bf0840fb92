//! Reservation storage.
//!
//! A guest's past stays are listed together with the reserved property and
//! that property's average review rating.

use serde::{Deserialize, Serialize};
use sqlx_core::from_row::FromRow;
use sqlx_core::query_as::query_as;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgRow};
use time::Date;
use tracing::instrument;

use crate::error::{StorageError, StorageResult, is_foreign_key_violation};
use crate::property::PropertyRow;

/// Number of reservations returned when no limit is given.
pub const DEFAULT_RESERVATION_LIMIT: u32 = 10;

// =============================================================================
// Types
// =============================================================================

/// Reservation record from database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationRow {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub start_date: Date,
    pub end_date: Date,
}

impl<'r> FromRow<'r, PgRow> for ReservationRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx_core::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            guest_id: row.try_get("guest_id")?,
            property_id: row.try_get("property_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
        })
    }
}

/// A past reservation with the reserved property and its average rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationListing {
    pub reservation: ReservationRow,
    pub property: PropertyRow,
    pub average_rating: Option<f64>,
}

impl<'r> FromRow<'r, PgRow> for ReservationListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx_core::Error> {
        let property = PropertyRow::from_row(row)?;
        Ok(Self {
            reservation: ReservationRow {
                id: row.try_get("reservation_id")?,
                guest_id: row.try_get("guest_id")?,
                property_id: property.id,
                start_date: row.try_get("start_date")?,
                end_date: row.try_get("end_date")?,
            },
            property,
            average_rating: row.try_get("average_rating")?,
        })
    }
}

/// Data for a reservation that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewReservation {
    pub guest_id: i32,
    pub property_id: i32,
    pub start_date: Date,
    pub end_date: Date,
}

impl NewReservation {
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidInput`] unless `start_date` is before
    /// `end_date`.
    pub fn validate(&self) -> StorageResult<()> {
        if self.start_date >= self.end_date {
            return Err(StorageError::invalid_input(format!(
                "start_date ({}) must be before end_date ({})",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Reservation Storage
// =============================================================================

/// Reservation storage operations.
pub struct ReservationStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> ReservationStorage<'a> {
    /// Create a new reservation storage with a connection pool reference.
    #[must_use]
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a guest's reservations that have already ended, earliest first.
    ///
    /// Only reservations whose property has at least one review are
    /// returned, since the average rating comes from an inner join.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn list_past_for_guest(
        &self,
        guest_id: i32,
        limit: u32,
    ) -> StorageResult<Vec<ReservationListing>> {
        let rows = query_as::<_, ReservationListing>(
            r#"
            SELECT properties.*,
                   reservations.id AS reservation_id,
                   reservations.guest_id,
                   reservations.start_date,
                   reservations.end_date,
                   avg(property_reviews.rating)::float8 AS average_rating
            FROM reservations
            JOIN properties ON properties.id = reservations.property_id
            JOIN property_reviews ON properties.id = property_reviews.property_id
            WHERE reservations.guest_id = $1
              AND reservations.end_date < now()::date
            GROUP BY properties.id, reservations.id
            ORDER BY reservations.start_date ASC
            LIMIT $2
            "#,
        )
        .bind(guest_id)
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a reservation and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the dates are invalid, the guest or property does
    /// not exist, or the database insert fails.
    pub async fn create(&self, reservation: &NewReservation) -> StorageResult<ReservationRow> {
        reservation.validate()?;

        let row = query_as::<_, ReservationRow>(
            r#"
            INSERT INTO reservations (guest_id, property_id, start_date, end_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, guest_id, property_id, start_date, end_date
            "#,
        )
        .bind(reservation.guest_id)
        .bind(reservation.property_id)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return StorageError::invalid_input(format!(
                    "Guest {} or property {} does not exist",
                    reservation.guest_id, reservation.property_id
                ));
            }
            StorageError::from(e)
        })?;

        Ok(row)
    }
}
