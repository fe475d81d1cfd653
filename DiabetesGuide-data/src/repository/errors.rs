use std::sync::PoisonError;
use thiserror::Error;
use crate::database::DatabaseError;

/// Failures while storing or loading patient profiles
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The record was rejected before it reached storage
    #[error("Invalid patient profile: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Profile query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("No SQLite connection available: {0}")]
    Pool(#[from] r2d2::Error),

    /// In-memory storage lock was poisoned by a panicking writer
    #[error("Profile storage lock poisoned: {0}")]
    Lock(String),

    #[error("Patient profile not found: {0}")]
    NotFound(String),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_pass_through() {
        let err = RepositoryError::from(DatabaseError::PoolNotInitialized);
        assert_eq!(err.to_string(), "Database pool is not initialized");
    }

    #[test]
    fn test_not_found_names_the_profile() {
        let err = RepositoryError::NotFound("abc".to_string());
        assert!(err.to_string().contains("abc"));
    }
}
