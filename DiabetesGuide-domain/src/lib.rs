// DiabetesGuide Domain
// Clinical decision engine and the services built around it

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Clinical report assembly and rendering
pub mod report;

// Health checks and system status
pub mod health;

// Re-export the database module from the data crate for convenience
pub use diabetes_guide_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
