use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument, warn};

use diabetes_guide_domain::entities::CreatePatientProfileRequest;
use diabetes_guide_domain::services::{create_default_assessment_service, AssessmentServiceTrait};

use crate::entities::patient::{convert_to_public_assessment, AssessmentResponse};
use crate::entities::ErrorResponse;

/// Service type for dependency injection
pub type SharedAssessmentService = Arc<dyn AssessmentServiceTrait>;

/// Create the default service for the handlers to use
pub fn create_service() -> SharedAssessmentService {
    Arc::new(create_default_assessment_service())
}

/// Assess a profile without storing it
#[utoipa::path(
    post,
    path = "/api/v1/assessments",
    request_body = CreatePatientProfileRequest,
    responses(
        (status = 200, description = "Risk score and advice", body = AssessmentResponse),
        (status = 400, description = "Profile out of range", body = ErrorResponse),
    ),
    tag = "assessments"
)]
#[instrument(skip(service, payload))]
pub async fn create_assessment(
    State(service): State<SharedAssessmentService>,
    payload: Result<Json<CreatePatientProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(request) = payload?;
    let assessment = service.evaluate(&request).map_err(|e| {
        warn!("Rejected assessment request: {}", e);
        ErrorResponse::from(e)
    })?;

    info!(
        risk_score = assessment.risk_score.value(),
        referral = assessment.advice.referral_required,
        "Assessment completed"
    );

    Ok((StatusCode::OK, Json(convert_to_public_assessment(None, assessment))))
}
