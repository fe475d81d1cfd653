// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export the repository mock from the data layer
pub use diabetes_guide_data::repository::tests::MockPatientProfileRepository;

use std::collections::HashMap;
use std::sync::RwLock;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::entities::advice::Assessment;
use crate::entities::patient::{CreatePatientProfileRequest, PatientProfile, PatientRecord, StorePatientRequest};
use crate::health::{HealthComponent, HealthServiceTrait, HealthStatus, SystemHealth};
use crate::report::{pdf, ClinicalReport};
use crate::services::assessment::{assess, AssessmentServiceError, AssessmentServiceTrait};

/// Mock assessment service keeping patients in a map.
///
/// Evaluation runs the real engine; only storage is faked.
#[derive(Debug, Default)]
pub struct MockAssessmentService {
    patients: RwLock<HashMap<String, PatientRecord>>,
    should_fail_validation: bool,
    should_fail_storage: bool,
}

impl MockAssessmentService {
    /// Create a new mock assessment service
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Configure the mock to fail every storage operation
    pub fn with_storage_failure(mut self) -> Self {
        self.should_fail_storage = true;
        self
    }

    /// Add a pre-defined patient to the mock
    pub fn with_patient(self, patient: PatientRecord) -> Self {
        if let Ok(mut patients) = self.patients.write() {
            patients.insert(patient.id.clone(), patient);
        }
        self
    }

    fn check_storage(&self) -> Result<(), AssessmentServiceError> {
        if self.should_fail_storage {
            Err(AssessmentServiceError::RepositoryError(
                "Repository error - mock is configured to fail storage".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn lock_error<T>(_: T) -> AssessmentServiceError {
        AssessmentServiceError::RepositoryError("Mock storage lock poisoned".to_string())
    }
}

#[async_trait]
impl AssessmentServiceTrait for MockAssessmentService {
    fn validate(&self, request: &CreatePatientProfileRequest)
        -> Result<PatientProfile, AssessmentServiceError>
    {
        if self.should_fail_validation {
            return Err(AssessmentServiceError::ValidationError(
                "Validation failed - mock is configured to fail validation".to_string(),
            ));
        }
        Ok(PatientProfile::from_request(request)?)
    }

    fn evaluate(&self, request: &CreatePatientProfileRequest)
        -> Result<Assessment, AssessmentServiceError>
    {
        let profile = self.validate(request)?;
        Ok(assess(&profile))
    }

    async fn create_patient(&self, request: StorePatientRequest)
        -> Result<PatientRecord, AssessmentServiceError>
    {
        if !request.consent {
            return Err(AssessmentServiceError::ConsentRequired);
        }
        let profile = self.validate(&request.profile)?;
        self.check_storage()?;

        let now = Utc::now().to_rfc3339();
        let record = PatientRecord {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            profile,
            consent_recorded_at: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        };

        self.patients.write()
            .map_err(Self::lock_error)?
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn list_patients(&self) -> Result<Vec<PatientRecord>, AssessmentServiceError> {
        self.check_storage()?;
        let mut patients: Vec<PatientRecord> = self.patients.read()
            .map_err(Self::lock_error)?
            .values()
            .cloned()
            .collect();
        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(patients)
    }

    async fn get_patient(&self, id: &str) -> Result<PatientRecord, AssessmentServiceError> {
        self.check_storage()?;
        self.patients.read()
            .map_err(Self::lock_error)?
            .get(id)
            .cloned()
            .ok_or_else(|| AssessmentServiceError::NotFound(id.to_string()))
    }

    async fn update_patient(&self, id: &str, request: StorePatientRequest)
        -> Result<PatientRecord, AssessmentServiceError>
    {
        let profile = self.validate(&request.profile)?;
        self.check_storage()?;

        let mut patients = self.patients.write().map_err(Self::lock_error)?;
        let record = patients
            .get_mut(id)
            .ok_or_else(|| AssessmentServiceError::NotFound(id.to_string()))?;
        record.name = request.name;
        record.profile = profile;
        record.updated_at = Utc::now().to_rfc3339();
        Ok(record.clone())
    }

    async fn delete_patient(&self, id: &str) -> Result<(), AssessmentServiceError> {
        self.check_storage()?;
        self.patients.write()
            .map_err(Self::lock_error)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AssessmentServiceError::NotFound(id.to_string()))
    }

    async fn assess_patient(&self, id: &str) -> Result<Assessment, AssessmentServiceError> {
        let patient = self.get_patient(id).await?;
        Ok(assess(&patient.profile))
    }

    async fn generate_report(&self, id: &str) -> Result<Vec<u8>, AssessmentServiceError> {
        let patient = self.get_patient(id).await?;
        let assessment = assess(&patient.profile);
        let report = ClinicalReport::build(patient.name.as_deref(), &patient.profile, &assessment);
        Ok(pdf::render_pdf(&report)?)
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    database_status: HealthStatus,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with a healthy database
    pub fn new() -> Self {
        Self { database_status: HealthStatus::Healthy }
    }

    /// Configure the mock with a degraded database
    pub fn with_degraded_database(mut self) -> Self {
        self.database_status = HealthStatus::Degraded;
        self
    }

    /// Configure the mock with an unhealthy database
    pub fn with_unhealthy_database(mut self) -> Self {
        self.database_status = HealthStatus::Unhealthy;
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let details = match self.database_status {
            HealthStatus::Healthy => None,
            HealthStatus::Degraded => Some("Using in-memory storage".to_string()),
            HealthStatus::Unhealthy => Some("Database connection failed".to_string()),
        };

        let mut components = HashMap::new();
        components.insert(
            "database".to_string(),
            HealthComponent { status: self.database_status, details },
        );
        SystemHealth::from_components(components)
    }
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}
