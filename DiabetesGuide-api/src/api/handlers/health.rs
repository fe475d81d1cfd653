use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use diabetes_guide_domain::health::{HealthServiceTrait, HealthService as DomainHealthService, HealthStatus};

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok", "degraded" or "error")
    pub status: String,
    /// Application version from the Cargo manifest
    pub version: String,
    /// When the response was generated (RFC 3339)
    pub timestamp: String,
    /// Seconds since the server started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Per-component status, keyed by component name
    pub components: BTreeMap<String, ComponentHealthStatus>,
    /// Deployment environment (APP_ENV)
    pub environment: String,
}

/// Health status for an individual component
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded" or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Shared health service handle
pub type SharedHealthService = Arc<dyn HealthServiceTrait + Send + Sync>;

static SERVER_START: OnceCell<Instant> = OnceCell::new();

/// Record the server start time; later calls are no-ops
pub fn initialize_server_start_time() {
    let _ = SERVER_START.set(Instant::now());
}

fn status_label(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "ok",
        HealthStatus::Degraded => "degraded",
        HealthStatus::Unhealthy => "error",
    }
}

/// Health check endpoint.
///
/// In-memory fallback storage still serves requests, so a degraded system
/// answers 200; only an unhealthy one answers 503.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy or degraded", body = HealthResponse),
        (status = 503, description = "API is unhealthy", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(
    Extension(health_service): Extension<SharedHealthService>,
) -> impl IntoResponse {
    info!("Health check requested");

    let system_health = health_service.get_system_health().await;

    let components = system_health
        .components
        .into_iter()
        .map(|(name, component)| {
            (
                name,
                ComponentHealthStatus {
                    status: status_label(component.status).to_string(),
                    message: component.details,
                },
            )
        })
        .collect();

    let response = HealthResponse {
        status: status_label(system_health.status).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime: SERVER_START.get().map(|start| start.elapsed().as_secs()),
        components,
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    let status = match system_health.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };

    (status, Json(response))
}

/// Factory function to create the health service
pub fn create_health_service() -> SharedHealthService {
    Arc::new(DomainHealthService)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diabetes_guide_domain::testing::MockHealthService;

    async fn call(service: MockHealthService) -> (StatusCode, HealthResponse) {
        let service: SharedHealthService = Arc::new(service);
        let response = health_check(Extension(service)).await.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_healthy_system() {
        initialize_server_start_time();
        let (status, body) = call(MockHealthService::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.components["database"].status, "ok");
        assert!(body.uptime.is_some());
    }

    #[tokio::test]
    async fn test_degraded_system_still_serves() {
        let (status, body) = call(MockHealthService::new().with_degraded_database()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "degraded");
    }

    #[tokio::test]
    async fn test_unhealthy_system() {
        let (status, body) = call(MockHealthService::new().with_unhealthy_database()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.components["database"].message.as_deref(), Some("Database connection failed"));
    }
}
