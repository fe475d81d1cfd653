use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use tracing::{info, instrument};

use crate::api::handlers::assessment::SharedAssessmentService;
use crate::entities::ErrorResponse;

pub const REPORT_FILENAME: &str = "diabetes_report.pdf";

/// Download the clinical PDF report for a stored patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/report",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 500, description = "Report could not be rendered", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn get_patient_report(
    State(service): State<SharedAssessmentService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let pdf = service.generate_report(&id).await?;
    info!(bytes = pdf.len(), "Report generated for patient {}", id);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILENAME),
            ),
        ],
        pdf,
    ))
}
