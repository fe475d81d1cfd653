use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::blood_pressure::BloodPressure;

/// Age used when the input surface does not supply one
pub const DEFAULT_AGE: u8 = 45;

/// HbA1c (mmol/mol) used when the input surface does not supply one
pub const DEFAULT_HBA1C: u16 = 40;

/// Weight (kg) used when the input surface does not supply one
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

/// Height assumed for every patient when deriving BMI
pub const ASSUMED_HEIGHT_M: f64 = 1.75;

/// Errors raised while building a profile from outside input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// A field was outside its accepted range
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored enumerated value could not be recognised
    #[error("Unknown {field}: {value}")]
    UnknownValue {
        field: &'static str,
        value: String,
    },
}

/// Ethnic groups distinguished by the risk rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum Ethnicity {
    #[default]
    White,
    #[serde(alias = "South Asian")]
    SouthAsian,
    #[serde(alias = "Black African")]
    BlackAfrican,
    #[serde(alias = "Mixed/Other")]
    MixedOther,
}

impl Ethnicity {
    pub const ALL: [Ethnicity; 4] = [
        Ethnicity::White,
        Ethnicity::SouthAsian,
        Ethnicity::BlackAfrican,
        Ethnicity::MixedOther,
    ];

    /// Human readable label, as shown on the input form
    pub fn label(&self) -> &'static str {
        match self {
            Ethnicity::White => "White",
            Ethnicity::SouthAsian => "South Asian",
            Ethnicity::BlackAfrican => "Black African",
            Ethnicity::MixedOther => "Mixed/Other",
        }
    }

    /// Stable identifier used on the wire and in storage
    pub fn wire_name(&self) -> &'static str {
        match self {
            Ethnicity::White => "White",
            Ethnicity::SouthAsian => "SouthAsian",
            Ethnicity::BlackAfrican => "BlackAfrican",
            Ethnicity::MixedOther => "MixedOther",
        }
    }
}

impl fmt::Display for Ethnicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Ethnicity {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ethnicity::ALL
            .into_iter()
            .find(|e| e.wire_name() == s || e.label() == s)
            .ok_or_else(|| ProfileError::UnknownValue {
                field: "ethnicity",
                value: s.to_string(),
            })
    }
}

/// Weekly physical activity bands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum ActivityLevel {
    #[serde(alias = "<30 mins")]
    Under30Min,
    #[default]
    #[serde(alias = "30-150 mins")]
    Between30And150Min,
    #[serde(alias = "150+ mins")]
    Over150Min,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 3] = [
        ActivityLevel::Under30Min,
        ActivityLevel::Between30And150Min,
        ActivityLevel::Over150Min,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Under30Min => "<30 mins",
            ActivityLevel::Between30And150Min => "30-150 mins",
            ActivityLevel::Over150Min => "150+ mins",
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            ActivityLevel::Under30Min => "Under30Min",
            ActivityLevel::Between30And150Min => "Between30And150Min",
            ActivityLevel::Over150Min => "Over150Min",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActivityLevel {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .into_iter()
            .find(|a| a.wire_name() == s || a.label() == s)
            .ok_or_else(|| ProfileError::UnknownValue {
                field: "activity_level",
                value: s.to_string(),
            })
    }
}

/// The clinical attributes the decision engine evaluates.
///
/// A profile is built once per evaluation and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PatientProfile {
    /// Age in years (18–100)
    pub age: u8,

    /// HbA1c in mmol/mol (20–150)
    pub hba1c: u16,

    /// Weight in kilograms (30–300)
    pub weight_kg: f64,

    /// Raw "systolic/diastolic" text; malformed values are kept and ignored
    pub blood_pressure: Option<String>,

    pub ethnicity: Ethnicity,

    pub activity_level: ActivityLevel,

    pub smoker: bool,

    pub family_history: bool,

    /// Free-text medication list, carried to reports only
    pub medications: Option<String>,
}

impl Default for PatientProfile {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            hba1c: DEFAULT_HBA1C,
            weight_kg: DEFAULT_WEIGHT_KG,
            blood_pressure: None,
            ethnicity: Ethnicity::default(),
            activity_level: ActivityLevel::default(),
            smoker: false,
            family_history: false,
            medications: None,
        }
    }
}

impl PatientProfile {
    /// Build a profile from a request, validating ranges and filling defaults
    pub fn from_request(request: &CreatePatientProfileRequest) -> Result<Self, ProfileError> {
        request.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|err| match &err.message {
                            Some(msg) => msg.to_string(),
                            None => format!("Invalid {}", field),
                        })
                        .collect();
                    format!("{}: {}", field, messages.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");
            ProfileError::Validation(message)
        })?;

        let defaults = Self::default();
        Ok(Self {
            // ranges were validated above, so the narrowing cannot fail
            age: request.age.and_then(|age| u8::try_from(age).ok()).unwrap_or(defaults.age),
            hba1c: request.hba1c.and_then(|hba1c| u16::try_from(hba1c).ok()).unwrap_or(defaults.hba1c),
            weight_kg: request.weight_kg.unwrap_or(defaults.weight_kg),
            blood_pressure: request
                .blood_pressure
                .as_deref()
                .map(str::trim)
                .filter(|bp| !bp.is_empty())
                .map(String::from),
            ethnicity: request.ethnicity.unwrap_or(defaults.ethnicity),
            activity_level: request.activity_level.unwrap_or(defaults.activity_level),
            smoker: request.smoker.unwrap_or(defaults.smoker),
            family_history: request.family_history.unwrap_or(defaults.family_history),
            medications: request.medications.clone().filter(|m| !m.trim().is_empty()),
        })
    }

    /// The blood pressure reading, if the raw text parses
    pub fn blood_pressure_reading(&self) -> Option<BloodPressure> {
        self.blood_pressure.as_deref().and_then(BloodPressure::parse)
    }

    /// BMI derived from weight and the fixed assumed height
    pub fn bmi(&self) -> f64 {
        self.weight_kg / (ASSUMED_HEIGHT_M * ASSUMED_HEIGHT_M)
    }
}

/// Profile fields as supplied by an input surface; absent fields take defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreatePatientProfileRequest {
    /// Age in years
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: Option<i64>,

    /// HbA1c in mmol/mol
    #[validate(range(min = 20, max = 150, message = "HbA1c must be between 20 and 150 mmol/mol"))]
    pub hba1c: Option<i64>,

    /// Weight in kilograms
    #[validate(range(min = 30.0, max = 300.0, message = "Weight must be between 30 and 300 kg"))]
    pub weight_kg: Option<f64>,

    /// Blood pressure as "systolic/diastolic", e.g. "120/80"
    #[validate(length(max = 32, message = "Blood pressure cannot exceed 32 characters"))]
    pub blood_pressure: Option<String>,

    pub ethnicity: Option<Ethnicity>,

    pub activity_level: Option<ActivityLevel>,

    pub smoker: Option<bool>,

    pub family_history: Option<bool>,

    /// Current medications
    #[validate(length(max = 2000, message = "Medications cannot exceed 2000 characters"))]
    pub medications: Option<String>,
}

/// Request to store a profile between assessments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct StorePatientRequest {
    /// Patient name, printed on reports
    pub name: Option<String>,

    /// Explicit consent to storing the profile; storage is refused without it
    #[serde(default)]
    pub consent: bool,

    #[serde(flatten)]
    pub profile: CreatePatientProfileRequest,
}

/// A stored profile together with its identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PatientRecord {
    pub id: String,
    pub name: Option<String>,
    pub profile: PatientProfile,
    pub consent_recorded_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_uses_defaults() {
        let profile = PatientProfile::from_request(&CreatePatientProfileRequest::default()).unwrap();
        assert_eq!(profile, PatientProfile::default());
        assert_eq!(profile.age, 45);
        assert_eq!(profile.hba1c, 40);
        assert_eq!(profile.ethnicity, Ethnicity::White);
        assert_eq!(profile.activity_level, ActivityLevel::Between30And150Min);
    }

    #[test]
    fn test_out_of_range_fields_are_rejected() {
        let request = CreatePatientProfileRequest {
            age: Some(17),
            ..Default::default()
        };
        let err = PatientProfile::from_request(&request).unwrap_err();
        assert!(err.to_string().contains("Age must be between 18 and 100"));

        let request = CreatePatientProfileRequest {
            hba1c: Some(151),
            ..Default::default()
        };
        assert!(PatientProfile::from_request(&request).is_err());

        let request = CreatePatientProfileRequest {
            weight_kg: Some(29.5),
            ..Default::default()
        };
        assert!(PatientProfile::from_request(&request).is_err());
    }

    #[test]
    fn test_wide_numbers_reach_validation() {
        let request: CreatePatientProfileRequest =
            serde_json::from_str(r#"{"age": 300, "hba1c": -1}"#).unwrap();

        let err = PatientProfile::from_request(&request).unwrap_err().to_string();
        assert!(err.contains("Age must be between 18 and 100"));
        assert!(err.contains("HbA1c must be between 20 and 150 mmol/mol"));
    }

    #[test]
    fn test_malformed_blood_pressure_is_kept_not_rejected() {
        let request = CreatePatientProfileRequest {
            blood_pressure: Some("not-a-number".to_string()),
            ..Default::default()
        };
        let profile = PatientProfile::from_request(&request).unwrap();
        assert_eq!(profile.blood_pressure.as_deref(), Some("not-a-number"));
        assert_eq!(profile.blood_pressure_reading(), None);
    }

    #[test]
    fn test_blank_blood_pressure_becomes_none() {
        let request = CreatePatientProfileRequest {
            blood_pressure: Some("   ".to_string()),
            ..Default::default()
        };
        let profile = PatientProfile::from_request(&request).unwrap();
        assert_eq!(profile.blood_pressure, None);
    }

    #[test]
    fn test_enum_labels_are_accepted_on_the_wire() {
        let request: CreatePatientProfileRequest = serde_json::from_str(
            r#"{"ethnicity": "South Asian", "activity_level": "<30 mins"}"#,
        )
        .unwrap();
        assert_eq!(request.ethnicity, Some(Ethnicity::SouthAsian));
        assert_eq!(request.activity_level, Some(ActivityLevel::Under30Min));

        let request: CreatePatientProfileRequest = serde_json::from_str(
            r#"{"ethnicity": "BlackAfrican", "activity_level": "Over150Min"}"#,
        )
        .unwrap();
        assert_eq!(request.ethnicity, Some(Ethnicity::BlackAfrican));
        assert_eq!(request.activity_level, Some(ActivityLevel::Over150Min));
    }

    #[test]
    fn test_from_str_round_trips_wire_names() {
        for ethnicity in Ethnicity::ALL {
            assert_eq!(ethnicity.wire_name().parse::<Ethnicity>(), Ok(ethnicity));
        }
        for activity in ActivityLevel::ALL {
            assert_eq!(activity.wire_name().parse::<ActivityLevel>(), Ok(activity));
        }
        assert!("Martian".parse::<Ethnicity>().is_err());
    }

    #[test]
    fn test_store_request_flattens_profile_fields() {
        let request: StorePatientRequest = serde_json::from_str(
            r#"{"name": "Jane", "consent": true, "age": 50, "hba1c": 48}"#,
        )
        .unwrap();
        assert!(request.consent);
        assert_eq!(request.profile.age, Some(50));
        assert_eq!(request.profile.hba1c, Some(48));
    }

    #[test]
    fn test_bmi_uses_assumed_height() {
        let profile = PatientProfile {
            weight_kg: 91.875,
            ..Default::default()
        };
        assert!((profile.bmi() - 30.0).abs() < 1e-9);
    }
}
