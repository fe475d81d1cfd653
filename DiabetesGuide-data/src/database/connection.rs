//! SQLite connection management for stored patient profiles.
//!
//! The pool is a process-wide singleton that the repository consults on
//! every call. When it has not been initialised the repository keeps
//! profiles in memory instead.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use once_cell::sync::OnceCell;
use rusqlite::OpenFlags;
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::migrations::run_sqlite_migrations;

static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Default location of the profile database
pub const DEFAULT_SQLITE_PATH: &str = "./data/diabetes_guide.db";

/// Prefix of the connection info for a pool that does not survive a restart
pub const IN_MEMORY_DATABASE: &str = "SQLite in-memory database";

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Sqlite,
}

impl FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("sqlite") {
            Ok(DatabaseType::Sqlite)
        } else {
            Err(DatabaseError::UnsupportedDatabaseType(s.to_string()))
        }
    }
}

/// r2d2 pool of SQLite connections
pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

/// Handle to the initialised storage pool
#[derive(Debug, Clone)]
pub enum DatabasePool {
    SQLite(Arc<SqlitePool>),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    #[error("Unsupported database type: {0} (only sqlite is available)")]
    UnsupportedDatabaseType(String),
}

/// Storage settings, read from `DB_*` environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub db_type: DatabaseType,
    /// Path to the SQLite file; `None` selects an in-memory database
    pub sqlite_path: Option<String>,
    /// Idle connections kept open
    pub pool_size: u32,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            sqlite_path: Some(DEFAULT_SQLITE_PATH.to_string()),
            pool_size: 5,
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Load from `DB_TYPE`, `DB_SQLITE_PATH`, `DB_POOL_SIZE`,
    /// `DB_MAX_CONNECTIONS` and `DB_TIMEOUT_SECONDS`
    pub fn from_env() -> Result<Self, DatabaseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    ///
    /// Unparseable numbers fall back to the defaults; an unknown `DB_TYPE` is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatabaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_type = match lookup("DB_TYPE") {
            Some(raw) => raw.parse::<DatabaseType>()?,
            None => defaults.db_type,
        };

        let number = |key: &str| lookup(key).and_then(|raw| raw.trim().parse::<u64>().ok());

        let max_connections = number("DB_MAX_CONNECTIONS")
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_connections);
        let pool_size = number("DB_POOL_SIZE")
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(defaults.pool_size)
            .min(max_connections);
        let timeout_seconds = number("DB_TIMEOUT_SECONDS").unwrap_or(defaults.timeout_seconds);

        let config = Self {
            db_type,
            sqlite_path: lookup("DB_SQLITE_PATH").or(defaults.sqlite_path),
            pool_size,
            max_connections,
            timeout_seconds,
        };
        debug!(?config, "Database configuration loaded");
        Ok(config)
    }
}

/// Initialise the global pool from the environment
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }
    initialize_database_pool_with(&DatabaseConfig::from_env()?)
}

/// Initialise the global pool from an explicit configuration.
///
/// A file that cannot be opened degrades to an in-memory SQLite database.
pub fn initialize_database_pool_with(config: &DatabaseConfig) -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let pool = match config.db_type {
        DatabaseType::Sqlite => {
            let opened = match config.sqlite_path.as_deref() {
                Some(path) => open_sqlite_file(path, config).or_else(|e| {
                    warn!("Cannot use SQLite file {} ({}), falling back to in-memory database", path, e);
                    build_in_memory_pool(config.timeout_seconds)
                })?,
                None => build_in_memory_pool(config.timeout_seconds)?,
            };
            DatabasePool::SQLite(Arc::new(opened))
        }
    };

    DB_POOL.set(pool).map_err(|_| DatabaseError::PoolAlreadyInitialized)?;
    info!("Database pool ready");
    Ok(())
}

/// The global pool, if initialised
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get().cloned().ok_or(DatabaseError::PoolNotInitialized)
}

fn open_sqlite_file(path: &str, config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    info!("Opening SQLite database at {}", path);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create {}: {}", parent.display(), e);
            }
        }
    }

    let manager = SqliteConnectionManager::file(path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    let pool = r2d2::Pool::builder()
        .min_idle(Some(config.pool_size))
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    run_sqlite_migrations(&*pool.get()?)?;
    Ok(pool)
}

/// Build a single-connection in-memory SQLite pool with the schema applied.
///
/// Each in-memory connection is a separate database, hence `max_size(1)`.
pub fn build_in_memory_pool(timeout_seconds: u64) -> Result<SqlitePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(timeout_seconds))
        .build(SqliteConnectionManager::memory())?;

    run_sqlite_migrations(&*pool.get()?)?;
    Ok(pool)
}

/// Describe the current pool for start-up logs and health checks
pub fn get_connection_info() -> Option<String> {
    let DatabasePool::SQLite(pool) = DB_POOL.get()?;

    let conn = match pool.get() {
        Ok(conn) => conn,
        Err(e) => return Some(format!("SQLite connection error: {}", e)),
    };

    // third column of `PRAGMA database_list` is the file name, empty for :memory:
    let location = match conn.query_row("PRAGMA database_list", [], |row| row.get::<_, String>(2)) {
        Ok(file) if file.is_empty() => IN_MEMORY_DATABASE.to_string(),
        Ok(file) => format!("SQLite database at {}", file),
        Err(_) => "SQLite database".to_string(),
    };

    let state = pool.state();
    Some(format!(
        "{} healthy (connections: {}, idle: {})",
        location, state.connections, state.idle_connections
    ))
}
