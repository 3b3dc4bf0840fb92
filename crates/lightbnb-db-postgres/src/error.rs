//! Error types for the PostgreSQL storage backend.
//!
//! [`StorageError`] is what the record accessors return. A lookup that finds
//! nothing is `Ok(None)`, never an error; a statement the store could not run
//! is always [`StorageError::Database`].

use sqlx_core::error::Error as SqlxError;

/// PostgreSQL error code for unique violation (23505).
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL error code for foreign key violation (23503).
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Checks if a sqlx error has a specific PostgreSQL error code.
pub fn has_pg_error_code(err: &SqlxError, code: &str) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.code().as_deref() == Some(code)
    } else {
        false
    }
}

/// Checks if a sqlx error is a unique violation (23505).
pub fn is_unique_violation(err: &SqlxError) -> bool {
    has_pg_error_code(err, PG_UNIQUE_VIOLATION)
}

/// Checks if a sqlx error is a foreign key violation (23503).
pub fn is_foreign_key_violation(err: &SqlxError) -> bool {
    has_pg_error_code(err, PG_FOREIGN_KEY_VIOLATION)
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors that can occur during record access.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    /// Record already exists (conflict).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StorageError {
    // -------------------------------------------------------------------------
    // Constructor Methods
    // -------------------------------------------------------------------------

    /// Create a `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    // -------------------------------------------------------------------------
    // Predicate Methods
    // -------------------------------------------------------------------------

    /// Returns `true` if this is a `Conflict` error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Returns `true` if this is a database error.
    #[must_use]
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Returns `true` if this is an invalid input error.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns `true` if the caller can fix this by changing the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::InvalidInput(_))
    }

    /// Returns `true` if the store failed to run the statement.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// Result type for record access.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// =============================================================================
// Backend Errors
// =============================================================================

/// Errors raised while setting up the PostgreSQL backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] SqlxError),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(e) => StorageError::Database(e),
            PostgresError::Config { message } => {
                StorageError::invalid_input(format!("Configuration error: {message}"))
            }
        }
    }
}

/// Result type alias for backend setup.
pub type Result<T> = std::result::Result<T, PostgresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_conflict() {
        let err = StorageError::conflict("email already registered");
        assert!(err.is_conflict());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_storage_error_invalid_input() {
        let err = StorageError::invalid_input("title must not be empty");
        assert!(err.is_invalid_input());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_database_error_is_not_a_client_error() {
        let err = StorageError::from(SqlxError::PoolTimedOut);
        assert!(err.is_database_error());
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_row_not_found_is_still_a_database_error() {
        // Only `Ok(None)` means "no record"; a sqlx error never does.
        let err = StorageError::from(SqlxError::RowNotFound);
        assert!(err.is_database_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_error_code_helpers_ignore_non_database_errors() {
        assert!(!is_unique_violation(&SqlxError::PoolClosed));
        assert!(!is_foreign_key_violation(&SqlxError::PoolClosed));
    }

    #[test]
    fn test_postgres_error_display() {
        let err = PostgresError::config("invalid URL");
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_conversion_to_storage_error() {
        let storage_err: StorageError = PostgresError::config("test error").into();
        assert!(storage_err.is_invalid_input());

        let storage_err: StorageError = PostgresError::from(SqlxError::PoolClosed).into();
        assert!(storage_err.is_database_error());
    }
}
