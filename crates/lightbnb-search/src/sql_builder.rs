//! SQL builder for parameterized PostgreSQL statements.
//!
//! Statements are assembled from [`Clause`]s. Each clause is written with its
//! own local placeholders (`$1`, `$2`, ...) and carries the values bound to
//! them. When the statement is rendered, clauses are emitted in a fixed
//! syntactic order and every local placeholder is shifted by the number of
//! parameters already pushed, so the Nth placeholder in the output always
//! references the Nth value of [`BuiltQuery::params`].
//!
//! ## Features
//!
//! - **Fixed clause order**: WHERE, GROUP BY, HAVING, ORDER BY, LIMIT,
//!   regardless of the order in which parts were added
//! - **Parameterized values**: user input is only ever bound, never spliced
//!   into statement text
//! - **Single-pass numbering**: placeholder indices come from the parameter
//!   list length at render time, never from a separately tracked counter

use std::fmt;

use serde::Serialize;

/// SQL value types for parameterized queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl SqlValue {
    /// Get the value as a string for display/debugging.
    pub fn as_display_str(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Null => "NULL".to_string(),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ============================================================================
// Placeholder handling
// ============================================================================

/// Returns the indices of all `$N` placeholders in `sql`, in order of
/// appearance.
///
/// Text inside single-quoted literals is skipped.
pub fn placeholders(sql: &str) -> Vec<usize> {
    let mut found = Vec::new();
    scan_placeholders(sql, |index| {
        found.push(index);
        None
    });
    found
}

/// Shifts every `$N` placeholder in `sql` to `$N+offset`.
pub(crate) fn renumber_placeholders(sql: &str, offset: usize) -> String {
    if offset == 0 {
        return sql.to_string();
    }
    scan_placeholders(sql, |index| Some(index + offset))
}

/// Walks `sql`, calling `on_placeholder` for each `$N` outside string
/// literals. A returned index replaces the original one in the output.
fn scan_placeholders<F>(sql: &str, mut on_placeholder: F) -> String
where
    F: FnMut(usize) -> Option<usize>,
{
    let mut out = String::with_capacity(sql.len() + 8);
    let mut chars = sql.char_indices().peekable();
    let mut in_literal = false;

    while let Some((pos, c)) = chars.next() {
        if c == '\'' {
            in_literal = !in_literal;
            out.push(c);
            continue;
        }

        if c != '$' || in_literal {
            out.push(c);
            continue;
        }

        let start = pos + 1;
        let mut end = start;
        while let Some(&(next_pos, next)) = chars.peek() {
            if !next.is_ascii_digit() {
                break;
            }
            end = next_pos + next.len_utf8();
            chars.next();
        }

        match sql[start..end].parse::<usize>() {
            Ok(index) => {
                let index = on_placeholder(index).unwrap_or(index);
                out.push('$');
                out.push_str(&index.to_string());
            }
            // A bare `$` (no digits) is copied through untouched.
            Err(_) => out.push_str(&sql[pos..end]),
        }
    }

    out
}

// ============================================================================
// Clauses
// ============================================================================

/// A SQL fragment with locally numbered placeholders and its bound values.
///
/// `$1` in the fragment refers to the first element of `params`, `$2` to the
/// second, and so on. Numbering is shifted when the clause is rendered into a
/// statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    sql: String,
    params: Vec<SqlValue>,
}

impl Clause {
    /// Create a clause from a fragment and the values its placeholders bind.
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        let sql = sql.into();
        debug_assert!(
            placeholders(&sql).iter().all(|&i| i >= 1 && i <= params.len()),
            "clause placeholders must reference its own parameters: {sql}"
        );
        Self { sql, params }
    }

    /// Create a clause with exactly one bound value referenced as `$1`.
    pub fn with_param(sql: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(sql, vec![value.into()])
    }

    /// Create a clause that binds nothing.
    pub fn fixed(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    /// The fragment with local placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The values bound by this clause, in placeholder order.
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Pushes this clause's values onto `params` and returns the fragment
    /// renumbered against the list as it was before the push.
    fn render_into(&self, params: &mut Vec<SqlValue>) -> String {
        let offset = params.len();
        params.extend(self.params.iter().cloned());
        renumber_placeholders(&self.sql, offset)
    }
}

// ============================================================================
// Sort
// ============================================================================

/// Sort order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// ============================================================================
// Statement Builder
// ============================================================================

/// Builder for a single SELECT statement with optional filters, grouping,
/// aggregate filters, ordering and a bound limit.
///
/// # Example
///
/// ```
/// use lightbnb_search::{Clause, SortOrder, StatementBuilder};
///
/// let query = StatementBuilder::new("SELECT * FROM properties")
///     .where_clause(Clause::with_param("city ILIKE $1", "%Boston%"))
///     .where_clause(Clause::with_param("owner_id = $1", 3))
///     .order_by("cost_per_night", SortOrder::Asc)
///     .limit(10_u32)
///     .build();
///
/// assert!(query.sql.contains("WHERE city ILIKE $1\n  AND owner_id = $2"));
/// assert!(query.sql.ends_with("LIMIT $3"));
/// ```
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    base: String,
    filters: Vec<Clause>,
    group_by: Vec<String>,
    having: Vec<Clause>,
    order_by: Vec<(String, SortOrder)>,
    limit: Option<SqlValue>,
}

impl StatementBuilder {
    /// Create a builder from the `SELECT ... FROM ...` part of the statement.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            filters: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Add a WHERE predicate (AND semantics).
    pub fn where_clause(mut self, clause: Clause) -> Self {
        self.filters.push(clause);
        self
    }

    /// Add a GROUP BY expression.
    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    /// Add a HAVING predicate (AND semantics).
    pub fn having(mut self, clause: Clause) -> Self {
        self.having.push(clause);
        self
    }

    /// Add an ORDER BY expression.
    pub fn order_by(mut self, expr: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((expr.into(), order));
        self
    }

    /// Set the row limit. It is always bound as the last parameter.
    pub fn limit(mut self, limit: impl Into<SqlValue>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Render the statement and its parameter list.
    pub fn build(&self) -> BuiltQuery {
        let mut params = Vec::new();
        let mut sql = self.base.clone();

        if !self.filters.is_empty() {
            let predicates = Self::render_all(&self.filters, &mut params);
            sql.push_str("\nWHERE ");
            sql.push_str(&predicates.join("\n  AND "));
        }

        if !self.group_by.is_empty() {
            sql.push_str("\nGROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.having.is_empty() {
            let predicates = Self::render_all(&self.having, &mut params);
            sql.push_str("\nHAVING ");
            sql.push_str(&predicates.join("\n  AND "));
        }

        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(|(expr, order)| format!("{expr} {}", order.as_sql()))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str("\nORDER BY ");
            sql.push_str(&order);
        }

        if let Some(limit) = &self.limit {
            params.push(limit.clone());
            sql.push_str(&format!("\nLIMIT ${}", params.len()));
        }

        BuiltQuery { sql, params }
    }

    fn render_all(clauses: &[Clause], params: &mut Vec<SqlValue>) -> Vec<String> {
        clauses.iter().map(|c| c.render_into(params)).collect()
    }
}

/// A built SQL query with parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl BuiltQuery {
    /// Parameter values rendered for logging.
    pub fn display_params(&self) -> Vec<String> {
        self.params.iter().map(SqlValue::as_display_str).collect()
    }
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}
