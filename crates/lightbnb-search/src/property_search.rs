//! Filtered property search.
//!
//! Builds the statement that lists properties together with their average
//! review rating, filtered by a [`SearchCriteria`], cheapest first.
//!
//! Predicates are added in a fixed order and only for criteria that are
//! present:
//!
//! 1. city (case-insensitive substring)
//! 2. owner
//! 3. nightly cost range, only when both bounds are given
//! 4. `GROUP BY properties.id` (always)
//! 5. minimum average rating, as a `HAVING` predicate
//! 6. `ORDER BY cost_per_night ASC LIMIT $N` (always, limit bound last)

use tracing::debug;

use crate::criteria::{SearchCriteria, contains_pattern};
use crate::money::cents_from_dollars;
use crate::sql_builder::{BuiltQuery, Clause, SortOrder, SqlValue, StatementBuilder};

/// Number of rows returned when no limit is given.
pub const DEFAULT_LIMIT: u32 = 10;

const PROPERTY_SEARCH_BASE: &str = "SELECT properties.*, avg(property_reviews.rating)::float8 AS average_rating\n\
     FROM properties\n\
     JOIN property_reviews ON properties.id = property_reviews.property_id";

/// A property search: criteria plus a row limit.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySearch {
    criteria: SearchCriteria,
    limit: u32,
}

impl PropertySearch {
    /// Create a search with the default limit.
    #[must_use]
    pub fn new(criteria: SearchCriteria) -> Self {
        Self {
            criteria,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the maximum number of rows returned.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Assemble the statement for this search without rendering it.
    pub fn statement(&self) -> StatementBuilder {
        let criteria = &self.criteria;
        let mut statement = StatementBuilder::new(PROPERTY_SEARCH_BASE);

        if let Some(city) = criteria.city_filter() {
            statement = statement.where_clause(Clause::with_param(
                "properties.city ILIKE $1",
                contains_pattern(city),
            ));
        }

        if let Some(owner_id) = criteria.owner_id {
            statement =
                statement.where_clause(Clause::with_param("properties.owner_id = $1", owner_id));
        }

        if let Some((minimum, maximum)) = criteria.price_range() {
            statement = statement.where_clause(Clause::new(
                "properties.cost_per_night BETWEEN $1 AND $2",
                vec![
                    SqlValue::Integer(cents_from_dollars(minimum)),
                    SqlValue::Integer(cents_from_dollars(maximum)),
                ],
            ));
        }

        statement = statement.group_by("properties.id");

        if let Some(rating) = criteria.minimum_rating {
            statement = statement.having(Clause::with_param(
                "avg(property_reviews.rating) >= $1",
                rating,
            ));
        }

        statement
            .order_by("properties.cost_per_night", SortOrder::Asc)
            .limit(self.limit)
    }

    /// Render the statement and its parameter list.
    pub fn build(&self) -> BuiltQuery {
        let query = self.statement().build();

        debug!(
            sql = %query.sql,
            params = ?query.display_params(),
            "Built property search query"
        );

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_builder::placeholders;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_no_filters() {
        let query = PropertySearch::new(SearchCriteria::new()).build();

        assert!(!query.sql.contains("WHERE"));
        assert!(!query.sql.contains("HAVING"));
        assert_eq!(count(&query.sql, "GROUP BY properties.id"), 1);
        assert!(query.sql.ends_with("ORDER BY properties.cost_per_night ASC\nLIMIT $1"));
        assert_eq!(query.params, vec![SqlValue::Integer(10)]);
    }

    #[test]
    fn test_city_with_limit() {
        let query = PropertySearch::new(SearchCriteria::new().with_city("Boston"))
            .with_limit(5)
            .build();

        assert_eq!(count(&query.sql, "ILIKE"), 1);
        assert!(query.sql.contains("WHERE properties.city ILIKE $1"));
        assert!(query.sql.ends_with("LIMIT $2"));
        assert_eq!(
            query.params,
            vec![SqlValue::Text("%Boston%".into()), SqlValue::Integer(5)]
        );
    }

    #[test]
    fn test_city_value_is_never_interpolated() {
        let query =
            PropertySearch::new(SearchCriteria::new().with_city("x'; DROP TABLE users; --"))
                .build();

        assert!(!query.sql.contains("DROP TABLE"));
        assert_eq!(
            query.params[0],
            SqlValue::Text("%x'; DROP TABLE users; --%".into())
        );
    }

    #[test]
    fn test_price_range_in_cents() {
        let query = PropertySearch::new(SearchCriteria::new().with_price_range(50, 150)).build();

        assert_eq!(count(&query.sql, "BETWEEN"), 1);
        assert!(query.sql.contains("properties.cost_per_night BETWEEN $1 AND $2"));
        assert_eq!(
            query.params,
            vec![
                SqlValue::Integer(5000),
                SqlValue::Integer(15000),
                SqlValue::Integer(10)
            ]
        );
    }

    #[test]
    fn test_single_price_bound_is_ignored() {
        for criteria in [
            SearchCriteria::new().with_minimum_price(50),
            SearchCriteria::new().with_maximum_price(150),
        ] {
            let query = PropertySearch::new(criteria).build();
            assert!(!query.sql.contains("BETWEEN"));
            assert!(!query.sql.contains("WHERE"));
            assert_eq!(query.params, vec![SqlValue::Integer(10)]);
        }
    }

    #[test]
    fn test_owner_without_city_starts_where() {
        let query = PropertySearch::new(SearchCriteria::new().with_owner_id(7)).build();

        assert!(query.sql.contains("WHERE properties.owner_id = $1"));
        assert!(!query.sql.contains("AND properties.owner_id"));
        assert_eq!(query.params[0], SqlValue::Integer(7));
    }

    #[test]
    fn test_minimum_rating_is_post_aggregation() {
        let query = PropertySearch::new(SearchCriteria::new().with_minimum_rating(4.0)).build();

        let group_pos = query.sql.find("GROUP BY").unwrap();
        let having_pos = query.sql.find("HAVING avg(property_reviews.rating) >= $1").unwrap();
        assert!(group_pos < having_pos);
        assert_eq!(
            query.params,
            vec![SqlValue::Float(4.0), SqlValue::Integer(10)]
        );
    }

    #[test]
    fn test_all_filters() {
        let criteria = SearchCriteria::new()
            .with_city("Vancouver")
            .with_owner_id(3)
            .with_price_range(100, 300)
            .with_minimum_rating(3.5);
        let query = PropertySearch::new(criteria).with_limit(20).build();

        assert!(query.sql.contains(
            "WHERE properties.city ILIKE $1\n  AND properties.owner_id = $2\n  AND properties.cost_per_night BETWEEN $3 AND $4"
        ));
        assert!(query.sql.contains("HAVING avg(property_reviews.rating) >= $5"));
        assert!(query.sql.ends_with("LIMIT $6"));
        assert_eq!(placeholders(&query.sql), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(
            query.params,
            vec![
                SqlValue::Text("%Vancouver%".into()),
                SqlValue::Integer(3),
                SqlValue::Integer(10000),
                SqlValue::Integer(30000),
                SqlValue::Float(3.5),
                SqlValue::Integer(20),
            ]
        );
    }

    #[test]
    fn test_skipped_criterion_does_not_leave_gap() {
        // City and rating present, owner and price absent
        let criteria = SearchCriteria::new()
            .with_city("Paris")
            .with_minimum_rating(2.0);
        let query = PropertySearch::new(criteria).build();

        assert_eq!(placeholders(&query.sql), vec![1, 2, 3]);
        assert!(query.sql.contains("HAVING avg(property_reviews.rating) >= $2"));
    }

    #[test]
    fn test_base_joins_reviews_and_aggregates() {
        let query = PropertySearch::new(SearchCriteria::new()).build();

        assert!(query.sql.starts_with("SELECT properties.*, avg(property_reviews.rating)"));
        assert!(query.sql.contains(
            "JOIN property_reviews ON properties.id = property_reviews.property_id"
        ));
    }
}
