// Domain services
// The decision engine (risk, advice) is pure; assessment wires it to storage and reports.
pub mod advice;
pub mod assessment;
pub mod insights;
pub mod risk;

// Re-export service traits and factory functions
pub use assessment::{
    assess, create_default_assessment_service, AssessmentService, AssessmentServiceError,
    AssessmentServiceTrait,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use assessment::create_mock_assessment_service;
