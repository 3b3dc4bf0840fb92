//! Optional filters for a property search.

use serde::{Deserialize, Serialize};

/// Filters for a property search. Every field is independently optional and
/// `None` means "no constraint".
///
/// Prices are whole dollars; they are converted to cents when the statement
/// is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the property's city.
    pub city: Option<String>,

    /// Only properties owned by this user.
    pub owner_id: Option<i32>,

    /// Lower bound on the nightly cost, in dollars.
    pub minimum_price_per_night: Option<i64>,

    /// Upper bound on the nightly cost, in dollars.
    pub maximum_price_per_night: Option<i64>,

    /// Lower bound on the average review rating.
    pub minimum_rating: Option<f64>,
}

impl SearchCriteria {
    /// Criteria with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub fn with_owner_id(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn with_minimum_price(mut self, dollars: i64) -> Self {
        self.minimum_price_per_night = Some(dollars);
        self
    }

    #[must_use]
    pub fn with_maximum_price(mut self, dollars: i64) -> Self {
        self.maximum_price_per_night = Some(dollars);
        self
    }

    /// Sets both price bounds.
    #[must_use]
    pub fn with_price_range(self, minimum: i64, maximum: i64) -> Self {
        self.with_minimum_price(minimum).with_maximum_price(maximum)
    }

    #[must_use]
    pub fn with_minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// The city filter, if one was given and is not blank.
    pub fn city_filter(&self) -> Option<&str> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }

    /// The price range in dollars, only when both bounds are present.
    ///
    /// A single bound does not constrain the search.
    pub fn price_range(&self) -> Option<(i64, i64)> {
        self.minimum_price_per_night
            .zip(self.maximum_price_per_night)
    }
}

/// Escapes `LIKE` metacharacters so the value matches literally.
///
/// PostgreSQL's default escape character for `LIKE`/`ILIKE` is backslash.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds a `%value%` substring pattern with the value escaped.
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_range_requires_both_bounds() {
        assert_eq!(SearchCriteria::new().with_minimum_price(50).price_range(), None);
        assert_eq!(SearchCriteria::new().with_maximum_price(150).price_range(), None);
        assert_eq!(
            SearchCriteria::new().with_price_range(50, 150).price_range(),
            Some((50, 150))
        );
    }

    #[test]
    fn test_blank_city_is_ignored() {
        let criteria = SearchCriteria::new().with_city("   ");
        assert_eq!(criteria.city_filter(), None);

        let criteria = SearchCriteria::new().with_city(" Vancouver ");
        assert_eq!(criteria.city_filter(), Some("Vancouver"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Boston"), "Boston");
        assert_eq!(escape_like("100%_off"), "100\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_contains_pattern() {
        assert_eq!(contains_pattern("Boston"), "%Boston%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
    }

    #[test]
    fn test_deserialize_partial_criteria() {
        let criteria: SearchCriteria = serde_json::from_str(
            r#"{"city": "Boston", "minimum_price_per_night": 50}"#,
        )
        .unwrap();

        assert_eq!(criteria.city.as_deref(), Some("Boston"));
        assert_eq!(criteria.minimum_price_per_night, Some(50));
        assert_eq!(criteria.maximum_price_per_night, None);
        assert_eq!(criteria.owner_id, None);
    }
}
