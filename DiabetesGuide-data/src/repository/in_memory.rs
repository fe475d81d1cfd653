use std::sync::{Arc, Mutex};
use std::collections::HashMap;

use crate::models::patient_profile::PatientProfileRecord;
use super::errors::RepositoryError;

/// In-memory storage implementation for patient profiles
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Stored profiles keyed by id
    profiles: Arc<Mutex<HashMap<String, PatientProfileRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Insert or overwrite a profile
    pub async fn store_profile(&self, profile: &PatientProfileRecord) -> Result<PatientProfileRecord, RepositoryError> {
        let mut store = self.profiles.lock()?;
        store.insert(profile.id.clone(), profile.clone());
        Ok(profile.clone())
    }

    /// Get all profiles, newest first
    pub async fn get_all(&self) -> Result<Vec<PatientProfileRecord>, RepositoryError> {
        let store = self.profiles.lock()?;
        let mut profiles: Vec<PatientProfileRecord> = store.values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(profiles)
    }

    /// Get a profile by id
    pub async fn get_by_id(&self, id: &str) -> Result<Option<PatientProfileRecord>, RepositoryError> {
        let store = self.profiles.lock()?;
        Ok(store.get(id).cloned())
    }

    /// Remove a profile, returning whether it existed
    pub async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.profiles.lock()?;
        Ok(store.remove(id).is_some())
    }
}
