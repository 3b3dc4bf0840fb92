//! Query construction for LightBnB property search.
//!
//! This crate has no database dependency. It turns a [`SearchCriteria`] into a
//! [`BuiltQuery`]: a PostgreSQL statement with `$N` placeholders and the
//! ordered list of values bound to them. Executing the query is the job of
//! `lightbnb-db-postgres`.
//!
//! ```
//! use lightbnb_search::{PropertySearch, SearchCriteria, SqlValue};
//!
//! let query = PropertySearch::new(SearchCriteria::new().with_city("Boston"))
//!     .with_limit(5)
//!     .build();
//!
//! assert_eq!(
//!     query.params,
//!     vec![SqlValue::Text("%Boston%".into()), SqlValue::Integer(5)]
//! );
//! ```

pub mod criteria;
pub mod money;
pub mod property_search;
pub mod sql_builder;

pub use criteria::SearchCriteria;
pub use money::{cents_from_dollars, dollars_from_cents};
pub use property_search::{DEFAULT_LIMIT, PropertySearch};
pub use sql_builder::{BuiltQuery, Clause, SortOrder, SqlValue, StatementBuilder, placeholders};
