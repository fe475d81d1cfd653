pub mod assessment;
pub mod health;
pub mod patients;
pub mod report;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use assessment::create_assessment;
pub use health::health_check;
pub use patients::{
    create_patient, delete_patient, get_patient, get_patient_assessment, list_patients, update_patient,
};
pub use report::get_patient_report;
