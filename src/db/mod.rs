//! Database module providing connection management, migrations, and the
//! storage capabilities used by ingestion.

pub mod results;
pub mod store;

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
    TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, SaveError};
use crate::migration::Migrator;
use crate::models::{PersistableAggregate, SaveReceipt};
use crate::services::result_builder;

pub use results::SeaOrmStore;
pub use store::{ResultStore, Storage};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database.url.clone());
        options
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        DbPool { conn }
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        info!("Database migrations complete");
        Ok(())
    }
}

#[async_trait]
impl Storage for DbPool {
    async fn ping(&self) -> Result<(), SaveError> {
        let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
        self.conn.query_one_raw(stmt).await?;
        Ok(())
    }

    async fn save_atomically(
        &self,
        aggregate: &mut PersistableAggregate,
    ) -> Result<SaveReceipt, SaveError> {
        let txn = self.conn.begin().await?;

        // Dropping the transaction on error rolls it back.
        let receipt = result_builder::save(aggregate, &SeaOrmStore::new(&txn)).await?;

        txn.commit().await?;
        debug!(
            "Committed suite result {} with {} scenario results",
            receipt.suite_result_id,
            receipt.scenario_ids.len()
        );
        Ok(receipt)
    }
}
