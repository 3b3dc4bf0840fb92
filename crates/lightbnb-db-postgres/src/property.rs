//! Property storage.
//!
//! Listing, lookup and filtered search of rental properties. Costs are integer
//! cents throughout.

use lightbnb_search::{PropertySearch, SearchCriteria};
use serde::{Deserialize, Serialize};
use sqlx_core::from_row::FromRow;
use sqlx_core::query_as::query_as;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgRow};
use tracing::{debug, instrument, warn};

use crate::bind::BindAllParams;
use crate::error::{StorageError, StorageResult, is_foreign_key_violation};

// =============================================================================
// Types
// =============================================================================

/// Property record from database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRow {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly cost in cents.
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

impl<'r> FromRow<'r, PgRow> for PropertyRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx_core::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            thumbnail_photo_url: row.try_get("thumbnail_photo_url")?,
            cover_photo_url: row.try_get("cover_photo_url")?,
            cost_per_night: row.try_get("cost_per_night")?,
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            province: row.try_get("province")?,
            post_code: row.try_get("post_code")?,
            country: row.try_get("country")?,
            parking_spaces: row.try_get("parking_spaces")?,
            number_of_bathrooms: row.try_get("number_of_bathrooms")?,
            number_of_bedrooms: row.try_get("number_of_bedrooms")?,
        })
    }
}

/// A property returned by a search, with its average review rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: PropertyRow,
    pub average_rating: Option<f64>,
}

impl<'r> FromRow<'r, PgRow> for PropertyListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx_core::Error> {
        Ok(Self {
            property: PropertyRow::from_row(row)?,
            average_rating: row.try_get("average_rating")?,
        })
    }
}

/// Data for a property that has not been stored yet.
///
/// Field order matches the insert statement's placeholders `$1..$14`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_photo_url: String,
    #[serde(default)]
    pub cover_photo_url: String,
    /// Nightly cost in cents.
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    #[serde(default)]
    pub parking_spaces: i32,
    #[serde(default)]
    pub number_of_bathrooms: i32,
    #[serde(default)]
    pub number_of_bedrooms: i32,
}

impl NewProperty {
    /// Rejects properties with missing address fields or negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> StorageResult<()> {
        let required = [
            ("title", &self.title),
            ("street", &self.street),
            ("city", &self.city),
            ("province", &self.province),
            ("post_code", &self.post_code),
            ("country", &self.country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(StorageError::invalid_input(format!(
                    "{field} must not be empty"
                )));
            }
        }

        let non_negative = [
            ("cost_per_night", self.cost_per_night),
            ("parking_spaces", self.parking_spaces),
            ("number_of_bathrooms", self.number_of_bathrooms),
            ("number_of_bedrooms", self.number_of_bedrooms),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(StorageError::invalid_input(format!(
                    "{field} must not be negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Property Storage
// =============================================================================

/// Property storage operations.
pub struct PropertyStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> PropertyStorage<'a> {
    /// Create a new property storage with a connection pool reference.
    #[must_use]
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a property by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> StorageResult<Option<PropertyRow>> {
        let row = query_as::<_, PropertyRow>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row)
    }

    /// Create a new property and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the property is invalid, the owner does not
    /// exist, or the database insert fails.
    #[instrument(skip(self, property), fields(owner_id = property.owner_id))]
    pub async fn create(&self, property: &NewProperty) -> StorageResult<PropertyRow> {
        property.validate()?;

        let row = query_as::<_, PropertyRow>(
            r#"
            INSERT INTO properties (
                owner_id, title, description, thumbnail_photo_url, cover_photo_url,
                cost_per_night, street, city, province, post_code, country,
                parking_spaces, number_of_bathrooms, number_of_bedrooms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.thumbnail_photo_url)
        .bind(&property.cover_photo_url)
        .bind(property.cost_per_night)
        .bind(&property.street)
        .bind(&property.city)
        .bind(&property.province)
        .bind(&property.post_code)
        .bind(&property.country)
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return StorageError::invalid_input(format!(
                    "Owner {} does not exist",
                    property.owner_id
                ));
            }
            StorageError::from(e)
        })?;

        debug!(property_id = row.id, "Property created");

        Ok(row)
    }

    /// Search properties matching `criteria`, cheapest first, with their
    /// average rating. At most `limit` listings are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        limit: u32,
    ) -> StorageResult<Vec<PropertyListing>> {
        let built = PropertySearch::new(criteria.clone())
            .with_limit(limit)
            .build();

        let rows = query_as::<_, PropertyListing>(&built.sql)
            .bind_all_params(&built.params)
            .fetch_all(self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, sql = %built.sql, "Property search failed");
                StorageError::from(e)
            })?;

        debug!(count = rows.len(), "Property search completed");

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_property(owner_id: i32) -> NewProperty {
        NewProperty {
            owner_id,
            title: "Speed lamp".into(),
            description: "description".into(),
            thumbnail_photo_url: "https://images.example.com/thumb.jpg".into(),
            cover_photo_url: "https://images.example.com/cover.jpg".into(),
            cost_per_night: 93061,
            street: "536 Namsub Highway".into(),
            city: "Sotboske".into(),
            province: "Quebec".into(),
            post_code: "28142".into(),
            country: "Canada".into(),
            parking_spaces: 6,
            number_of_bathrooms: 4,
            number_of_bedrooms: 8,
        }
    }

    #[test]
    fn test_new_property_validation() {
        assert!(sample_property(1).validate().is_ok());

        let mut property = sample_property(1);
        property.city = "  ".into();
        let err = property.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("city"));

        let mut property = sample_property(1);
        property.cost_per_night = -1;
        assert!(property.validate().unwrap_err().to_string().contains("cost_per_night"));
    }

    #[test]
    fn test_new_property_deserialize_defaults() {
        let property: NewProperty = serde_json::from_str(
            r#"{
                "owner_id": 1,
                "title": "Cabin",
                "cost_per_night": 10000,
                "street": "1 Lake Rd",
                "city": "Banff",
                "province": "Alberta",
                "post_code": "T1L",
                "country": "Canada"
            }"#,
        )
        .unwrap();

        assert_eq!(property.description, "");
        assert_eq!(property.parking_spaces, 0);
        assert!(property.validate().is_ok());
    }

    #[test]
    fn test_listing_serializes_flat() {
        let listing = PropertyListing {
            property: PropertyRow {
                id: 1,
                owner_id: 2,
                title: "Cabin".into(),
                description: String::new(),
                thumbnail_photo_url: String::new(),
                cover_photo_url: String::new(),
                cost_per_night: 10000,
                street: "1 Lake Rd".into(),
                city: "Banff".into(),
                province: "Alberta".into(),
                post_code: "T1L".into(),
                country: "Canada".into(),
                parking_spaces: 1,
                number_of_bathrooms: 1,
                number_of_bedrooms: 2,
            },
            average_rating: Some(4.5),
        };

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["title"], "Cabin");
        assert_eq!(json["average_rating"], 4.5);
    }
}
