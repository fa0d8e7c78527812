use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::request::ValidationErrors;
use crate::db::SourceError;
use crate::render::RenderError;
use crate::storage::StorageError;
use crate::ErrorResponse;

/// Failures of a report request, by the layer that produced them.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("record source failed: {0}")]
    Source(#[from] SourceError),
    #[error("report rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("report delivery failed: {0}")]
    Storage(#[from] StorageError),
    #[error("report worker failed: {0}")]
    Worker(String),
}

impl ReportError {
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::Validation(errors) => ErrorResponse::bad_request(&errors.to_string()),
            Self::Source(_) => {
                ErrorResponse::service_unavailable("Não foi possível acessar os dados dos clientes.")
            }
            Self::Storage(_) => {
                ErrorResponse::bad_gateway("Não foi possível disponibilizar o relatório.")
            }
            Self::Render(_) | Self::Worker(_) => {
                ErrorResponse::internal_error("Falha ao gerar o relatório em PDF.")
            }
        }
    }
}

impl ResponseError for ReportError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Source(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Render(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_error_response())
    }
}
