// Repository module structure
pub mod errors;
mod patient_profile;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStorage;
pub use patient_profile::{PatientProfileRepository, PatientProfileRepositoryTrait};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use patient_profile::tests;
