use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    routing::post,
    Extension,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::handlers::{assessment, health, patients, report};
use crate::api::handlers::assessment::SharedAssessmentService;
use crate::api::handlers::health::SharedHealthService;
use crate::openapi::configure_swagger_routes;

/// Create the application router with the default services
pub async fn create_app() -> Router {
    create_app_with(assessment::create_service(), health::create_health_service())
}

/// Create the application router around the given services
pub fn create_app_with(assessment_service: SharedAssessmentService, health_service: SharedHealthService) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/assessments", post(assessment::create_assessment))
        .route("/patients", get(patients::list_patients).post(patients::create_patient))
        .route(
            "/patients/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route("/patients/:id/assessment", get(patients::get_patient_assessment))
        .route("/patients/:id/report", get(report::get_patient_report));

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(assessment_service);

    let app = add_swagger_ui(app);
    debug!("Swagger UI merged");

    let app = configure_security(app).layer(TraceLayer::new_for_http());
    debug!("Security configuration applied");

    health::initialize_server_start_time();

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

/// Apply CORS and security response headers to every route
pub fn configure_security(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        ));

    app.layer(cors).layer(security_headers)
}
