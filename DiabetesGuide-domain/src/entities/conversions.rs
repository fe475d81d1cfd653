use diabetes_guide_data::models::patient_profile::{CreatePatientProfileRecord, PatientProfileRecord};
use uuid::Uuid;

use crate::entities::patient::{PatientProfile, PatientRecord, ProfileError};

/// Conversion functions between domain entities and data models.
/// They follow the convert_to_[target_layer]_[model_name] naming.

/// Parse a string id into a UUID with a readable error
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Convert a validated profile and its identity into a storage create request
pub fn convert_to_data_create_record(name: Option<String>, profile: &PatientProfile)
    -> CreatePatientProfileRecord
{
    CreatePatientProfileRecord {
        name: name.filter(|n| !n.trim().is_empty()),
        age: profile.age,
        hba1c: profile.hba1c,
        weight_kg: profile.weight_kg,
        blood_pressure: profile.blood_pressure.clone(),
        ethnicity: profile.ethnicity.wire_name().to_string(),
        activity_level: profile.activity_level.wire_name().to_string(),
        smoker: profile.smoker,
        family_history: profile.family_history,
        medications: profile.medications.clone(),
    }
}

/// Convert a stored record into a domain record.
///
/// Fails only when the stored enum names are not recognised.
pub fn convert_to_domain_record(record: PatientProfileRecord) -> Result<PatientRecord, ProfileError> {
    let profile = PatientProfile {
        age: record.age,
        hba1c: record.hba1c,
        weight_kg: record.weight_kg,
        blood_pressure: record.blood_pressure,
        ethnicity: record.ethnicity.parse()?,
        activity_level: record.activity_level.parse()?,
        smoker: record.smoker,
        family_history: record.family_history,
        medications: record.medications,
    };

    Ok(PatientRecord {
        id: record.id,
        name: record.name,
        profile,
        consent_recorded_at: record.consent_recorded_at,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}
