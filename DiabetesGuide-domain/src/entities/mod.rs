// Domain entities and value objects
pub mod advice;
pub mod blood_pressure;
pub mod conversions;
pub mod patient;

// Re-export common types for easier imports
pub use advice::{AdviceResult, Assessment, Priority, RiskLevel, RiskScore};
pub use blood_pressure::{BloodPressure, BloodPressureCategory};
pub use patient::{
    ActivityLevel, CreatePatientProfileRequest, Ethnicity, PatientProfile, PatientRecord,
    ProfileError, StorePatientRequest,
};
