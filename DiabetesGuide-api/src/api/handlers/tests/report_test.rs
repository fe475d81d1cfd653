use axum::{
    body::to_bytes,
    http::{header, StatusCode},
};
use tower::ServiceExt;

use diabetes_guide_domain::entities::{PatientProfile, PatientRecord};
use diabetes_guide_domain::testing::MockAssessmentService;

use super::empty_request;
use crate::api::handlers::report::REPORT_FILENAME;
use crate::api::routes::tests::{create_test_app, create_test_app_with};

#[tokio::test]
async fn test_report_is_pdf_attachment() {
    let patient = PatientRecord {
        id: "report-patient".to_string(),
        name: Some("Report Patient".to_string()),
        profile: PatientProfile::default(),
        consent_recorded_at: "2026-01-01T00:00:00+00:00".to_string(),
        created_at: "2026-01-01T00:00:00+00:00".to_string(),
        updated_at: "2026-01-01T00:00:00+00:00".to_string(),
    };
    let app = create_test_app_with(MockAssessmentService::new().with_patient(patient));

    let response = app
        .oneshot(empty_request("GET", "/api/v1/patients/report-patient/report"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains(REPORT_FILENAME));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_report_for_missing_patient() {
    let app = create_test_app();

    let response = app
        .oneshot(empty_request("GET", "/api/v1/patients/unknown/report"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
