use thiserror::Error;
use tracing::{error, info, warn};
use async_trait::async_trait;

use diabetes_guide_data::repository::{PatientProfileRepositoryTrait, RepositoryError};

use crate::entities::advice::Assessment;
use crate::entities::conversions;
use crate::entities::patient::{
    CreatePatientProfileRequest, PatientProfile, PatientRecord, ProfileError, StorePatientRequest,
};
use crate::report::{pdf, ClinicalReport, ReportError};
use crate::services::{advice, risk};

/// Evaluate a profile: score first, then advice built from that score
pub fn assess(profile: &PatientProfile) -> Assessment {
    let risk_score = risk::score(profile);
    let advice = advice::generate(profile, risk_score);

    Assessment {
        risk_score,
        risk_level: risk_score.level(),
        advice,
        rules_version: risk::RULES_VERSION.to_string(),
    }
}

/// Assessment service errors
#[derive(Debug, Error)]
pub enum AssessmentServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Storage refused because consent was not given
    #[error("Consent to data storage is required")]
    ConsentRequired,

    /// Not found error
    #[error("Patient not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Report rendering error
    #[error("Report error: {0}")]
    ReportError(String),
}

impl From<ProfileError> for AssessmentServiceError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Validation(msg) => AssessmentServiceError::ValidationError(msg),
            // unreadable stored values
            other => AssessmentServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<ReportError> for AssessmentServiceError {
    fn from(err: ReportError) -> Self {
        AssessmentServiceError::ReportError(err.to_string())
    }
}

/// Trait for assessment service operations
#[async_trait]
pub trait AssessmentServiceTrait: Send + Sync {
    /// Validate a profile request and apply defaults
    fn validate(&self, request: &CreatePatientProfileRequest)
        -> Result<PatientProfile, AssessmentServiceError>;

    /// Assess a profile without storing anything
    fn evaluate(&self, request: &CreatePatientProfileRequest)
        -> Result<Assessment, AssessmentServiceError>;

    /// Store a profile; requires consent
    async fn create_patient(&self, request: StorePatientRequest)
        -> Result<PatientRecord, AssessmentServiceError>;

    /// Get all stored patients, newest first
    async fn list_patients(&self) -> Result<Vec<PatientRecord>, AssessmentServiceError>;

    /// Get a stored patient by ID
    async fn get_patient(&self, id: &str) -> Result<PatientRecord, AssessmentServiceError>;

    /// Replace a stored patient's profile
    async fn update_patient(&self, id: &str, request: StorePatientRequest)
        -> Result<PatientRecord, AssessmentServiceError>;

    /// Remove a stored patient
    async fn delete_patient(&self, id: &str) -> Result<(), AssessmentServiceError>;

    /// Assess a stored patient from their current profile
    async fn assess_patient(&self, id: &str) -> Result<Assessment, AssessmentServiceError>;

    /// Render the clinical report for a stored patient as PDF bytes
    async fn generate_report(&self, id: &str) -> Result<Vec<u8>, AssessmentServiceError>;
}

/// Assessment service backed by a patient profile repository
pub struct AssessmentService<R: PatientProfileRepositoryTrait> {
    repository: R,
}

impl<R: PatientProfileRepositoryTrait> AssessmentService<R> {
    /// Create a new assessment service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> AssessmentServiceError {
        match err {
            RepositoryError::NotFound(msg) => AssessmentServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => AssessmentServiceError::ValidationError(msg),
            _ => {
                error!("Repository failure: {}", err);
                AssessmentServiceError::RepositoryError(err.to_string())
            }
        }
    }
}

#[async_trait]
impl<R: PatientProfileRepositoryTrait + Send + Sync> AssessmentServiceTrait for AssessmentService<R> {
    fn validate(&self, request: &CreatePatientProfileRequest)
        -> Result<PatientProfile, AssessmentServiceError>
    {
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
            warn!("Refusing to store patient profile without consent");
            return Err(AssessmentServiceError::ConsentRequired);
        }

        let profile = self.validate(&request.profile)?;
        let data_request = conversions::convert_to_data_create_record(request.name, &profile);

        let stored = self.repository.create(data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Stored patient profile {}", stored.id);
        Ok(conversions::convert_to_domain_record(stored)?)
    }

    async fn list_patients(&self) -> Result<Vec<PatientRecord>, AssessmentServiceError> {
        let stored = self.repository.get_all()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        stored.into_iter()
            .map(|record| conversions::convert_to_domain_record(record).map_err(Into::into))
            .collect()
    }

    async fn get_patient(&self, id: &str) -> Result<PatientRecord, AssessmentServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id)
            .map_err(AssessmentServiceError::ValidationError)?;

        let stored = self.repository.get_by_id(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| AssessmentServiceError::NotFound(id.to_string()))?;

        Ok(conversions::convert_to_domain_record(stored)?)
    }

    async fn update_patient(&self, id: &str, request: StorePatientRequest)
        -> Result<PatientRecord, AssessmentServiceError>
    {
        let id_uuid = conversions::parse_string_to_uuid(id)
            .map_err(AssessmentServiceError::ValidationError)?;

        let profile = self.validate(&request.profile)?;
        let data_request = conversions::convert_to_data_create_record(request.name, &profile);

        let stored = self.repository.update(id_uuid, data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Updated patient profile {}", stored.id);
        Ok(conversions::convert_to_domain_record(stored)?)
    }

    async fn delete_patient(&self, id: &str) -> Result<(), AssessmentServiceError> {
        let id_uuid = conversions::parse_string_to_uuid(id)
            .map_err(AssessmentServiceError::ValidationError)?;

        self.repository.delete(id_uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Deleted patient profile {}", id);
        Ok(())
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

/// Create a default assessment service using the repository from the data layer
pub fn create_default_assessment_service() -> impl AssessmentServiceTrait {
    let repository = diabetes_guide_data::repository::PatientProfileRepository::new();
    AssessmentService::new(repository)
}

/// Create a mock assessment service for testing
#[cfg(feature = "mock")]
pub fn create_mock_assessment_service() -> impl AssessmentServiceTrait {
    crate::testing::MockAssessmentService::new()
}
