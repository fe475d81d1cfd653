// DiabetesGuide-api lib.rs
//
// HTTP surface of DiabetesGuide: routes, handlers, public entities and OpenAPI docs.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
