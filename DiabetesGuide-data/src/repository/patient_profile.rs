use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;
use async_trait::async_trait;

use crate::models::patient_profile::{CreatePatientProfileRecord, PatientProfileRecord};
use crate::database::{get_db_pool, DatabasePool};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for stored patient profiles
#[async_trait]
pub trait PatientProfileRepositoryTrait {
    /// Store a new profile
    async fn create(&self, request: CreatePatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError>;

    /// Get all stored profiles, newest first
    async fn get_all(&self) -> Result<Vec<PatientProfileRecord>, RepositoryError>;

    /// Get a profile by id
    async fn get_by_id(&self, id: Uuid) -> Result<Option<PatientProfileRecord>, RepositoryError>;

    /// Replace the clinical fields of an existing profile
    async fn update(&self, id: Uuid, request: CreatePatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError>;

    /// Delete a profile
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Repository for patient profiles.
///
/// Uses the SQLite pool when one is available and in-memory storage only
/// when no pool was ever initialised. Once a pool exists its errors are
/// returned to the caller; records never land in memory behind its back.
#[derive(Debug, Clone, Default)]
pub struct PatientProfileRepository {
    /// In-memory storage for when no database is configured
    storage: InMemoryStorage,
    /// Explicit pool; the global one is used when unset
    pool: Option<DatabasePool>,
}

impl PatientProfileRepository {
    /// Create a new repository backed by the global pool
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
            pool: None,
        }
    }

    /// Create a repository bound to the given pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            storage: InMemoryStorage::new(),
            pool: Some(pool),
        }
    }

    fn database(&self) -> Option<DatabasePool> {
        match &self.pool {
            Some(pool) => Some(pool.clone()),
            None => match get_db_pool() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    debug!("{}, using in-memory storage", e);
                    None
                }
            },
        }
    }

    async fn store(&self, profile: PatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError> {
        match self.database() {
            Some(pool) => {
                debug!("Storing patient profile in database: {}", profile.id);
                DatabaseStorage::store_profile(&pool, &profile).await.map_err(|e| {
                    error!("Failed to store profile {}: {}", profile.id, e);
                    e
                })?;
                Ok(profile)
            },
            None => self.storage.store_profile(&profile).await,
        }
    }
}

#[async_trait]
impl PatientProfileRepositoryTrait for PatientProfileRepository {
    async fn create(&self, request: CreatePatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let profile = PatientProfileRecord::from_create(Uuid::new_v4().to_string(), request, &now);
        self.store(profile).await
    }

    async fn get_all(&self) -> Result<Vec<PatientProfileRecord>, RepositoryError> {
        match self.database() {
            Some(pool) => DatabaseStorage::get_all(&pool).await.map_err(|e| {
                error!("Failed to get profiles from database: {}", e);
                e
            }),
            None => self.storage.get_all().await,
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<PatientProfileRecord>, RepositoryError> {
        let id = id.to_string();
        match self.database() {
            Some(pool) => DatabaseStorage::get_by_id(&pool, &id).await.map_err(|e| {
                error!("Failed to get profile {} from database: {}", id, e);
                e
            }),
            None => self.storage.get_by_id(&id).await,
        }
    }

    async fn update(&self, id: Uuid, request: CreatePatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError> {
        let existing = self.get_by_id(id).await?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        let now = Utc::now().to_rfc3339();
        self.store(existing.replaced_with(request, &now)).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let id = id.to_string();
        let removed = match self.database() {
            Some(pool) => DatabaseStorage::delete(&pool, &id).await.map_err(|e| {
                error!("Failed to delete profile {} from database: {}", id, e);
                e
            })?,
            None => self.storage.delete(&id).await?,
        };

        if removed {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(id))
        }
    }
}

/// Mock patient profile repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock implementation of PatientProfileRepository backed by a plain vector
    #[derive(Debug, Clone, Default)]
    pub struct MockPatientProfileRepository {
        profiles: Arc<Mutex<Vec<PatientProfileRecord>>>,
    }

    impl MockPatientProfileRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined profiles
        pub fn with_profiles(profiles: Vec<PatientProfileRecord>) -> Self {
            Self { profiles: Arc::new(Mutex::new(profiles)) }
        }
    }

    #[async_trait]
    impl PatientProfileRepositoryTrait for MockPatientProfileRepository {
        async fn create(&self, request: CreatePatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError> {
            let profile = PatientProfileRecord::from_create(
                Uuid::new_v4().to_string(),
                request,
                &Utc::now().to_rfc3339(),
            );
            self.profiles.lock()?.push(profile.clone());
            Ok(profile)
        }

        async fn get_all(&self) -> Result<Vec<PatientProfileRecord>, RepositoryError> {
            let mut profiles = self.profiles.lock()?.clone();
            profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
            Ok(profiles)
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<PatientProfileRecord>, RepositoryError> {
            let id = id.to_string();
            Ok(self.profiles.lock()?.iter().find(|p| p.id == id).cloned())
        }

        async fn update(&self, id: Uuid, request: CreatePatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError> {
            let id = id.to_string();
            let mut profiles = self.profiles.lock()?;
            let slot = profiles.iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
            *slot = slot.replaced_with(request, &Utc::now().to_rfc3339());
            Ok(slot.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
            let id = id.to_string();
            let mut profiles = self.profiles.lock()?;
            let before = profiles.len();
            profiles.retain(|p| p.id != id);
            if profiles.len() == before {
                Err(RepositoryError::NotFound(id))
            } else {
                Ok(())
            }
        }
    }

}
