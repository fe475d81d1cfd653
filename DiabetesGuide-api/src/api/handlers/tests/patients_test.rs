use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use diabetes_guide_domain::entities::{PatientProfile, PatientRecord};
use diabetes_guide_domain::testing::MockAssessmentService;

use super::{empty_request, json_request, read_json};
use crate::api::routes::tests::{create_test_app, create_test_app_with};

const TEST_ID: &str = "12345678-1234-1234-1234-123456789012";

fn stored_patient() -> PatientRecord {
    PatientRecord {
        id: TEST_ID.to_string(),
        name: Some("Test Patient".to_string()),
        profile: PatientProfile {
            hba1c: 50,
            ..PatientProfile::default()
        },
        consent_recorded_at: "2026-01-01T00:00:00+00:00".to_string(),
        created_at: "2026-01-01T00:00:00+00:00".to_string(),
        updated_at: "2026-01-01T00:00:00+00:00".to_string(),
    }
}

#[tokio::test]
async fn test_create_patient_requires_consent() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/v1/patients", json!({ "name": "No Consent", "age": 40 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json(response).await;
    assert_eq!(body["error"], "consent_required");
}

#[tokio::test]
async fn test_create_patient_with_consent() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/v1/patients", json!({
            "name": "Jane Doe",
            "consent": true,
            "age": 40,
            "hba1c": 38
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["name"], "Jane Doe");
    assert_eq!(body["profile"]["age"], 40);
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn test_create_patient_with_impossible_age() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/v1/patients", json!({ "consent": true, "age": 300 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_list_patients() {
    let app = create_test_app_with(MockAssessmentService::new().with_patient(stored_patient()));

    let response = app
        .oneshot(empty_request("GET", "/api/v1/patients"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["id"], TEST_ID);
}

#[tokio::test]
async fn test_get_missing_patient() {
    let app = create_test_app();

    let response = app
        .oneshot(empty_request("GET", &format!("/api/v1/patients/{}", TEST_ID)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_update_patient() {
    let app = create_test_app_with(MockAssessmentService::new().with_patient(stored_patient()));

    let response = app
        .oneshot(json_request("PUT", &format!("/api/v1/patients/{}", TEST_ID), json!({
            "name": "Renamed",
            "age": 60
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["profile"]["age"], 60);
}

#[tokio::test]
async fn test_delete_patient() {
    let app = create_test_app_with(MockAssessmentService::new().with_patient(stored_patient()));

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/patients/{}", TEST_ID)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", &format!("/api/v1/patients/{}", TEST_ID)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stored_patient_assessment() {
    let app = create_test_app_with(MockAssessmentService::new().with_patient(stored_patient()));

    let response = app
        .oneshot(empty_request("GET", &format!("/api/v1/patients/{}/assessment", TEST_ID)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["patient_id"], TEST_ID);
    assert_eq!(body["referral_required"], true);
    assert_eq!(body["priority"], "High");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = create_test_app_with(MockAssessmentService::new().with_storage_failure());

    let response = app
        .oneshot(empty_request("GET", "/api/v1/patients"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"], "internal_error");
}
