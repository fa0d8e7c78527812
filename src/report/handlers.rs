use actix_web::{error::InternalError, web, HttpResponse};
use log::warn;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ReportError;
use super::request::GenerateReportRequest;
use super::service::{self, GeneratedReport};
use crate::{AppState, ErrorResponse};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[schema(example = "https://project.supabase.co/storage/v1/object/sign/relatorios/reports/2024/03/relatorio.pdf?token=...")]
    pub download_url: String,
    #[schema(example = "relatorio-hotel-sol-janeiro-de-2024.pdf")]
    pub file_name: String,
    /// Seconds until `download_url` stops working.
    #[schema(example = 900)]
    pub expires_in: u64,
}

impl From<GeneratedReport> for ReportResponse {
    fn from(report: GeneratedReport) -> Self {
        Self {
            download_url: report.download_url,
            file_name: report.file_name,
            expires_in: report.expires_in,
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Report Service",
    post,
    path = "/generate-report",
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "Report rendered and uploaded", body = ReportResponse),
        (status = 400, description = "Missing or invalid filters", body = ErrorResponse),
        (status = 500, description = "PDF rendering failed", body = ErrorResponse),
        (status = 502, description = "Object storage failed", body = ErrorResponse),
        (status = 503, description = "Record source unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_report(
    state: web::Data<AppState>,
    body: web::Json<GenerateReportRequest>,
) -> Result<HttpResponse, ReportError> {
    let report = service::generate_report(&state, body.into_inner())
        .await
        .map_err(|e| {
            warn!("Report request failed: {}", e);
            e
        })?;
    Ok(HttpResponse::Ok().json(ReportResponse::from(report)))
}

/// Malformed JSON bodies answer with the same error shape as other failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        warn!("Rejected report request body: {}", message);
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
        )
        .into()
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/generate-report").route(web::post().to(generate_report)))
        .service(web::resource("/generate_report").route(web::post().to(generate_report)));
}
