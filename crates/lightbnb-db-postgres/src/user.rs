//! User storage.
//!
//! Stores guest and owner accounts. Passwords are stored exactly as given;
//! hashing is the caller's concern.

use serde::{Deserialize, Serialize};
use sqlx_core::from_row::FromRow;
use sqlx_core::query_as::query_as;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgRow};

use crate::error::{StorageError, StorageResult, is_unique_violation};

// =============================================================================
// Types
// =============================================================================

/// User record from database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl<'r> FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx_core::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
        })
    }
}

/// Data for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Rejects users that the store would accept but the application cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidInput`] for a blank name or password, or
    /// an email without exactly one `@` separating non-empty parts.
    pub fn validate(&self) -> StorageResult<()> {
        if self.name.trim().is_empty() {
            return Err(StorageError::invalid_input("name must not be empty"));
        }
        if self.password.is_empty() {
            return Err(StorageError::invalid_input("password must not be empty"));
        }
        match self.email.trim().split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(())
            }
            _ => Err(StorageError::invalid_input(format!(
                "'{}' is not a valid email address",
                self.email
            ))),
        }
    }
}

// =============================================================================
// User Storage
// =============================================================================

/// User storage operations.
pub struct UserStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> UserStorage<'a> {
    /// Create a new user storage with a connection pool reference.
    #[must_use]
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email, ignoring letter case.
    ///
    /// Both sides are folded by the database's `lower()`, so the stored
    /// address always matches itself whatever its characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRow>> {
        let row = query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE lower(email) = lower($1)
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(email.trim())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Find a user by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> StorageResult<Option<UserRow>> {
        let row = query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Create a new user and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is invalid, the email is already
    /// registered, or the database insert fails.
    pub async fn create(&self, user: &NewUser) -> StorageResult<UserRow> {
        user.validate()?;

        let row = query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(user.name.trim())
        .bind(user.email.trim())
        .bind(&user.password)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return StorageError::conflict(format!(
                    "User with email '{}' already exists",
                    user.email.trim()
                ));
            }
            StorageError::from(e)
        })?;

        Ok(row)
    }
}
