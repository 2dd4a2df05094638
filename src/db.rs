use anyhow::{Context, Result, bail};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{MySqlPool, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::store::cache::CachedCredentialStore;
use crate::store::mysql::{MySqlCredentialStore, MySqlEmployeeStore};
use crate::store::sqlite::{SqliteCredentialStore, SqliteEmployeeStore};
use crate::store::{CredentialStore, EmployeeStore};

/// The two store ports, backed by the same pool.
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub employees: Arc<dyn EmployeeStore>,
}

impl Stores {
    pub fn mysql(pool: MySqlPool, username_cache_capacity: u64) -> Self {
        Self::cached(
            Arc::new(MySqlCredentialStore::new(pool.clone())),
            Arc::new(MySqlEmployeeStore::new(pool)),
            username_cache_capacity,
        )
    }

    pub fn sqlite(pool: SqlitePool, username_cache_capacity: u64) -> Self {
        Self::cached(
            Arc::new(SqliteCredentialStore::new(pool.clone())),
            Arc::new(SqliteEmployeeStore::new(pool)),
            username_cache_capacity,
        )
    }

    fn cached(
        credentials: Arc<dyn CredentialStore>,
        employees: Arc<dyn EmployeeStore>,
        username_cache_capacity: u64,
    ) -> Self {
        Self {
            credentials: Arc::new(CachedCredentialStore::new(credentials, username_cache_capacity)),
            employees,
        }
    }
}

/// Connects to the database named by `DATABASE_URL` and applies migrations.
pub async fn init_db(config: &Config) -> Result<Stores> {
    let url = config.database_url.as_str();

    if url.starts_with("mysql://") {
        info!("Connecting to MySQL");
        let pool = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .context("Failed to connect to MySQL")?;

        sqlx::migrate!("./migrations/mysql")
            .run(&pool)
            .await
            .context("Failed to run MySQL migrations")?;

        Ok(Stores::mysql(pool, config.username_cache_capacity))
    } else if url.starts_with("sqlite:") {
        info!("Connecting to SQLite");
        let pool = connect_sqlite(url, config.db_max_connections).await?;
        run_sqlite_migrations(&pool).await?;

        Ok(Stores::sqlite(pool, config.username_cache_capacity))
    } else {
        bail!("DATABASE_URL must start with mysql:// or sqlite:");
    }
}

pub async fn connect_sqlite(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let in_memory = url.contains(":memory:");
    let mut opts = SqliteConnectOptions::from_str(url)
        .context("Invalid SQLite connection string")?
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        opts = opts.create_if_missing(true).journal_mode(SqliteJournalMode::Wal);
    }

    // every connection to :memory: is a separate database
    let max_connections = if in_memory { 1 } else { max_connections };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .context("Failed to connect to SQLite")
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .context("Failed to run SQLite migrations")
}
