use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Assessment endpoints
        crate::api::handlers::assessment::create_assessment,

        // Patient endpoints
        crate::api::handlers::patients::create_patient,
        crate::api::handlers::patients::list_patients,
        crate::api::handlers::patients::get_patient,
        crate::api::handlers::patients::update_patient,
        crate::api::handlers::patients::delete_patient,
        crate::api::handlers::patients::get_patient_assessment,
        crate::api::handlers::report::get_patient_report
    ),
    components(
        schemas(
            // Public entities
            crate::entities::common::ErrorResponse,
            crate::entities::patient::PatientResponse,
            crate::entities::patient::PatientListResponse,
            crate::entities::patient::AssessmentResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain input types
            diabetes_guide_domain::entities::CreatePatientProfileRequest,
            diabetes_guide_domain::entities::StorePatientRequest,
            diabetes_guide_domain::entities::PatientProfile,
            diabetes_guide_domain::entities::Ethnicity,
            diabetes_guide_domain::entities::ActivityLevel,
            diabetes_guide_domain::entities::Priority,
            diabetes_guide_domain::entities::RiskLevel
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "assessments", description = "Stateless diabetes risk assessment"),
        (name = "patients", description = "Stored patient profiles, assessments and reports")
    ),
    info(
        title = "DiabetesGuide API",
        version = "0.1.0",
        description = "Diabetes risk scoring, clinical advice and GP reports",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "DiabetesGuide API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "assessments"));
        assert!(tags.iter().any(|tag| tag.name == "patients"));

        let paths = &openapi.paths.paths;
        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/api/v1/assessments"));
        assert!(paths.contains_key("/api/v1/patients"));
        assert!(paths.contains_key("/api/v1/patients/{id}"));
        assert!(paths.contains_key("/api/v1/patients/{id}/assessment"));
        assert!(paths.contains_key("/api/v1/patients/{id}/report"));
    }

    #[test]
    fn test_schemas_include_profile_types() {
        let openapi = ApiDoc::openapi();
        let schemas = &openapi.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("CreatePatientProfileRequest"));
        assert!(schemas.contains_key("AssessmentResponse"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
