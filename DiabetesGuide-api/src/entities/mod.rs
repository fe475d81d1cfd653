// Public entities for the DiabetesGuide API
// Wire shapes that cross the HTTP boundary

// Error response shared by every handler
pub mod common;

// Patient and assessment responses
pub mod patient;

pub use common::ErrorResponse;
pub use patient::{AssessmentResponse, PatientListResponse, PatientResponse};
