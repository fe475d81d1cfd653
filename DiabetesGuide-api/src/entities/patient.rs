use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use diabetes_guide_domain::entities::{
    Assessment, PatientProfile, PatientRecord, Priority, RiskLevel,
};

/// A stored patient as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientResponse {
    /// Unique identifier
    pub id: String,

    /// Patient name, if given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Clinical profile with defaults applied
    pub profile: PatientProfile,

    /// When consent to storage was recorded (RFC 3339)
    pub consent_recorded_at: String,

    /// When the profile was first stored (RFC 3339)
    pub created_at: String,

    /// When the profile was last replaced (RFC 3339)
    pub updated_at: String,
}

/// List of stored patients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientListResponse {
    pub total: usize,
    pub data: Vec<PatientResponse>,
}

/// Risk score and advice for one profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResponse {
    /// Stored patient the assessment belongs to, absent for ad hoc assessments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    /// Estimated 10-year diabetes risk in percent (0.0–70.0)
    pub risk_score: f64,

    /// Risk tier derived from the score
    pub risk_level: RiskLevel,

    /// Overall urgency
    pub priority: Priority,

    /// Banner line with the risk overlay
    pub summary: String,

    /// Ordered most urgent first
    pub recommendations: Vec<String>,

    /// Whether any rule asked for a GP referral
    pub referral_required: bool,

    /// Version of the rule set used
    pub rules_version: String,
}

/// Convert a domain record to its public form
pub fn convert_to_public_patient(record: PatientRecord) -> PatientResponse {
    PatientResponse {
        id: record.id,
        name: record.name,
        profile: record.profile,
        consent_recorded_at: record.consent_recorded_at,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// Convert a domain assessment to its public form
pub fn convert_to_public_assessment(patient_id: Option<String>, assessment: Assessment) -> AssessmentResponse {
    AssessmentResponse {
        patient_id,
        risk_score: assessment.risk_score.value(),
        risk_level: assessment.risk_level,
        priority: assessment.advice.priority,
        summary: assessment.advice.summary,
        recommendations: assessment.advice.recommendations,
        referral_required: assessment.advice.referral_required,
        rules_version: assessment.rules_version,
    }
}
