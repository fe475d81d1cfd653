use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use diabetes_guide_domain::entities::StorePatientRequest;

use crate::api::handlers::assessment::SharedAssessmentService;
use crate::entities::patient::{
    convert_to_public_assessment, convert_to_public_patient, AssessmentResponse, PatientListResponse,
    PatientResponse,
};
use crate::entities::ErrorResponse;

/// Store a patient profile. Requires `consent: true`.
#[utoipa::path(
    post,
    path = "/api/v1/patients",
    request_body = StorePatientRequest,
    responses(
        (status = 201, description = "Patient stored", body = PatientResponse),
        (status = 400, description = "Profile out of range", body = ErrorResponse),
        (status = 403, description = "Consent not given", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service, payload))]
pub async fn create_patient(
    State(service): State<SharedAssessmentService>,
    payload: Result<Json<StorePatientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(request) = payload?;
    let record = service.create_patient(request).await?;
    info!("Patient created with ID: {}", record.id);
    Ok((StatusCode::CREATED, Json(convert_to_public_patient(record))))
}

/// List stored patients, newest first
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    responses(
        (status = 200, description = "Stored patients", body = PatientListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn list_patients(
    State(service): State<SharedAssessmentService>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let data: Vec<PatientResponse> = service
        .list_patients()
        .await?
        .into_iter()
        .map(convert_to_public_patient)
        .collect();

    Ok(Json(PatientListResponse { total: data.len(), data }))
}

/// Get one stored patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient found", body = PatientResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn get_patient(
    State(service): State<SharedAssessmentService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let record = service.get_patient(&id).await?;
    Ok(Json(convert_to_public_patient(record)))
}

/// Replace a stored patient's profile
#[utoipa::path(
    put,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient ID")),
    request_body = StorePatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = PatientResponse),
        (status = 400, description = "Profile out of range", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service, payload))]
pub async fn update_patient(
    State(service): State<SharedAssessmentService>,
    Path(id): Path<String>,
    payload: Result<Json<StorePatientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(request) = payload?;
    let record = service.update_patient(&id, request).await?;
    info!("Patient updated: {}", record.id);
    Ok(Json(convert_to_public_patient(record)))
}

/// Delete a stored patient (consent withdrawal)
#[utoipa::path(
    delete,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn delete_patient(
    State(service): State<SharedAssessmentService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    service.delete_patient(&id).await?;
    info!("Patient deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Recompute the assessment for a stored patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/assessment",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Risk score and advice", body = AssessmentResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn get_patient_assessment(
    State(service): State<SharedAssessmentService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let assessment = service.assess_patient(&id).await?;
    Ok(Json(convert_to_public_assessment(Some(id), assessment)))
}
