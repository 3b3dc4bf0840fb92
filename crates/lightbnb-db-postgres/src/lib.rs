//! PostgreSQL record accessors for LightBnB.
//!
//! Provides access to:
//!
//! - Users (lookup by email or id, registration)
//! - Properties (insert, lookup, filtered search with average rating)
//! - Reservations (a guest's past stays, booking)
//!
//! Every accessor issues exactly one statement against a shared pool. A
//! lookup that matches nothing returns `Ok(None)`; a statement the store
//! rejects returns [`StorageError::Database`].
//!
//! # Example
//!
//! ```ignore
//! use lightbnb_db_postgres::{PostgresConfig, PostgresLightbnbStorage};
//! use lightbnb_search::{DEFAULT_LIMIT, SearchCriteria};
//!
//! let storage = PostgresLightbnbStorage::connect(
//!     &PostgresConfig::new("postgres://localhost/lightbnb"),
//! )
//! .await?;
//!
//! let user = storage.users().find_by_email("Alice@Example.com").await?;
//! let listings = storage
//!     .properties()
//!     .search(&SearchCriteria::new().with_city("Vancouver"), DEFAULT_LIMIT)
//!     .await?;
//!
//! storage.close().await;
//! ```

mod bind;
mod config;
mod error;
mod pool;

pub mod property;
pub mod reservation;
pub mod user;

use std::sync::Arc;

use sqlx_postgres::PgPool;
use tracing::info;

pub use config::PostgresConfig;
pub use error::{PostgresError, Result, StorageError, StorageResult};
pub use pool::{create_pool, mask_password, test_connection};
pub use property::{NewProperty, PropertyListing, PropertyRow, PropertyStorage};
pub use reservation::{
    DEFAULT_RESERVATION_LIMIT, NewReservation, ReservationListing, ReservationRow,
    ReservationStorage,
};
pub use user::{NewUser, UserRow, UserStorage};

// =============================================================================
// PostgreSQL LightBnB Storage
// =============================================================================

/// Handle over a shared connection pool.
///
/// Create it once at startup, hand out the borrowed accessors per call, and
/// [`close`](Self::close) it at shutdown.
#[derive(Debug, Clone)]
pub struct PostgresLightbnbStorage {
    pool: Arc<PgPool>,
}

impl PostgresLightbnbStorage {
    /// Create new storage with an existing connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create new storage by building a pool from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the connection fails.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let pool = create_pool(config).await?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Checks that the database answers.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can run `SELECT 1`.
    pub async fn ping(&self) -> Result<()> {
        test_connection(&self.pool).await
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    ///
    /// Clones of this handle share the pool and are closed too.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }

    // -------------------------------------------------------------------------
    // Storage Accessors
    // -------------------------------------------------------------------------

    /// Get user storage operations.
    #[must_use]
    pub fn users(&self) -> UserStorage<'_> {
        UserStorage::new(&self.pool)
    }

    /// Get property storage operations.
    #[must_use]
    pub fn properties(&self) -> PropertyStorage<'_> {
        PropertyStorage::new(&self.pool)
    }

    /// Get reservation storage operations.
    #[must_use]
    pub fn reservations(&self) -> ReservationStorage<'_> {
        ReservationStorage::new(&self.pool)
    }
}
