//! System health as seen from the domain layer.
//!
//! The engine has no external dependencies, so the only component that can
//! degrade is profile storage.

use std::collections::HashMap;
use async_trait::async_trait;
use serde::Serialize;
use diabetes_guide_data::database;

use crate::services::risk::RULES_VERSION;

/// Overall or per-component health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    /// Functional with reduced capability (e.g. in-memory storage only)
    Degraded,
    Unhealthy,
}

/// Health of one component with optional details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthComponent {
    pub status: HealthStatus,
    pub details: Option<String>,
}

/// Overall health of the system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Derive the overall status from the worst component
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if components.values().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;
}

/// Health service reading the shared database pool
#[derive(Debug, Default, Clone)]
pub struct HealthService;

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        get_system_health().await
    }
}

/// Storage health.
///
/// Storage that loses data on restart (no pool, or an in-memory SQLite
/// fallback) still serves requests and is reported as degraded.
pub fn check_storage() -> HealthComponent {
    storage_component(database::get_connection_info())
}

/// Classify the storage connection info
pub fn storage_component(info: Option<String>) -> HealthComponent {
    match info {
        Some(info) if info.starts_with(database::IN_MEMORY_DATABASE) => HealthComponent {
            status: HealthStatus::Degraded,
            details: Some(format!("{} (profiles are lost on restart)", info)),
        },
        Some(info) if info.contains("healthy") => HealthComponent {
            status: HealthStatus::Healthy,
            details: Some(info),
        },
        Some(info) => HealthComponent {
            status: HealthStatus::Unhealthy,
            details: Some(info),
        },
        None => HealthComponent {
            status: HealthStatus::Degraded,
            details: Some("Database not initialized, using in-memory storage".to_string()),
        },
    }
}

/// Get overall system health
pub async fn get_system_health() -> SystemHealth {
    let mut components = HashMap::new();
    components.insert("database".to_string(), check_storage());
    components.insert(
        "engine".to_string(),
        HealthComponent {
            status: HealthStatus::Healthy,
            details: Some(format!("rules version {}", RULES_VERSION)),
        },
    );

    SystemHealth::from_components(components)
}
