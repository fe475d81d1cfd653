use serde::{Deserialize, Serialize};

/// Storage model for a patient profile
///
/// Enumerated attributes are kept as their wire names so the storage layer
/// stays independent of the domain's types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfileRecord {
    /// Unique identifier for the profile
    pub id: String,

    /// Optional patient name, only used on reports
    pub name: Option<String>,

    /// Age in years
    pub age: u8,

    /// HbA1c in mmol/mol
    pub hba1c: u16,

    /// Weight in kilograms
    pub weight_kg: f64,

    /// Raw "systolic/diastolic" text as entered
    pub blood_pressure: Option<String>,

    /// Ethnicity wire name (e.g. "SouthAsian")
    pub ethnicity: String,

    /// Activity level wire name (e.g. "Under30Min")
    pub activity_level: String,

    /// Current smoker
    pub smoker: bool,

    /// Family history of diabetes
    pub family_history: bool,

    /// Free-text medication list
    pub medications: Option<String>,

    /// When consent to storage was recorded (RFC 3339)
    pub consent_recorded_at: String,

    /// When the profile was first stored (RFC 3339)
    pub created_at: String,

    /// When the profile was last replaced (RFC 3339)
    pub updated_at: String,
}

/// Input data for storing a new patient profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePatientProfileRecord {
    pub name: Option<String>,
    pub age: u8,
    pub hba1c: u16,
    pub weight_kg: f64,
    pub blood_pressure: Option<String>,
    pub ethnicity: String,
    pub activity_level: String,
    pub smoker: bool,
    pub family_history: bool,
    pub medications: Option<String>,
}

impl PatientProfileRecord {
    /// Build a stored record from a create request
    pub fn from_create(id: String, request: CreatePatientProfileRecord, now: &str) -> Self {
        Self {
            id,
            name: request.name,
            age: request.age,
            hba1c: request.hba1c,
            weight_kg: request.weight_kg,
            blood_pressure: request.blood_pressure,
            ethnicity: request.ethnicity,
            activity_level: request.activity_level,
            smoker: request.smoker,
            family_history: request.family_history,
            medications: request.medications,
            consent_recorded_at: now.to_string(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Replace the clinical fields, keeping identity and consent timestamps
    pub fn replaced_with(&self, request: CreatePatientProfileRecord, now: &str) -> Self {
        Self {
            id: self.id.clone(),
            consent_recorded_at: self.consent_recorded_at.clone(),
            created_at: self.created_at.clone(),
            ..Self::from_create(self.id.clone(), request, now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CreatePatientProfileRecord {
        CreatePatientProfileRecord {
            name: Some("Jane Doe".to_string()),
            age: 50,
            hba1c: 44,
            weight_kg: 82.5,
            blood_pressure: Some("135/85".to_string()),
            ethnicity: "White".to_string(),
            activity_level: "Between30And150Min".to_string(),
            smoker: false,
            family_history: true,
            medications: None,
        }
    }

    #[test]
    fn test_replaced_with_keeps_identity_and_consent() {
        let original = PatientProfileRecord::from_create(
            "abc".to_string(),
            sample_request(),
            "2024-01-01T00:00:00+00:00",
        );

        let update = CreatePatientProfileRecord {
            hba1c: 49,
            smoker: true,
            ..sample_request()
        };
        let replaced = original.replaced_with(update, "2024-02-01T00:00:00+00:00");

        assert_eq!(replaced.id, "abc");
        assert_eq!(replaced.hba1c, 49);
        assert!(replaced.smoker);
        assert_eq!(replaced.created_at, "2024-01-01T00:00:00+00:00");
        assert_eq!(replaced.consent_recorded_at, "2024-01-01T00:00:00+00:00");
        assert_eq!(replaced.updated_at, "2024-02-01T00:00:00+00:00");
    }
}
