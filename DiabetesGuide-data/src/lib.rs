// DiabetesGuide Data
// This crate persists patient profiles between assessments

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
