use std::time::Duration;

use hbnb_core::AppError;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::config::DatabaseConfig;
use crate::repository::PgStore;

/// Schema for users, amenities, places and the place–amenity join table.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// A request waiting longer than this for a pooled connection fails with a
/// `DatabaseError` instead of hanging.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the PostgreSQL pool and hands out [`PgStore`]s over it.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect and bring the schema up to date.
    ///
    /// This is what both the server and the `hbnb` CLI call at startup.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, AppError> {
        let db = Self::connect(config).await?;
        db.migrate().await?;
        Ok(db)
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&config.url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {e}")))?;

        tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply any migrations not yet recorded in `_sqlx_migrations`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {e}")))?;

        tracing::info!(known = MIGRATOR.iter().count(), "Schema up to date");
        Ok(())
    }

    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }
}
