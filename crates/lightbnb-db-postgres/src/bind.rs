//! Binding [`SqlValue`] parameter lists onto sqlx queries.

use lightbnb_search::SqlValue;
use sqlx_core::query_as::QueryAs;
use sqlx_postgres::{PgArguments, Postgres};

/// Helper trait to bind all params to a query, in placeholder order.
pub(crate) trait BindAllParams<'q> {
    fn bind_all_params(self, params: &'q [SqlValue]) -> Self;
}

impl<'q, O> BindAllParams<'q> for QueryAs<'q, Postgres, O, PgArguments> {
    fn bind_all_params(mut self, params: &'q [SqlValue]) -> Self {
        for param in params {
            self = match param {
                SqlValue::Text(s) => self.bind(s.as_str()),
                SqlValue::Integer(i) => self.bind(*i),
                SqlValue::Float(f) => self.bind(*f),
                SqlValue::Boolean(b) => self.bind(*b),
                SqlValue::Null => self.bind(None::<String>),
            };
        }
        self
    }
}
