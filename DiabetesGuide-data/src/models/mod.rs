pub mod patient_profile;

pub use patient_profile::{CreatePatientProfileRecord, PatientProfileRecord};
