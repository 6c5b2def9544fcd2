use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::export::ExportError;
use crate::store::StoreError;

/// Failure of a single workflow operation. None of these stop the process.
#[derive(Debug, Display)]
pub enum WorkflowError {
    #[display(fmt = "End date cannot be before the start date")]
    InvalidRange,
    #[display(fmt = "Please provide a reason for rejection")]
    EmptyReason,
    #[display(fmt = "Leave request {} not found or already processed", _0)]
    NotFound(u64),
    #[display(fmt = "Unknown employee: {}", _0)]
    UnknownEmployee(String),
    #[display(fmt = "Unsupported document {}. Allowed: pdf, png, jpg, jpeg", _0)]
    UnsupportedDocument(String),
    #[display(fmt = "Document not found")]
    DocumentMissing,
    #[display(fmt = "Storage failure: {}", _0)]
    Storage(StoreError),
    #[display(fmt = "Export failed: {}", _0)]
    Export(ExportError),
}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkflowError::Storage(e) => Some(e),
            WorkflowError::Export(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        WorkflowError::Storage(e)
    }
}

impl From<ExportError> for WorkflowError {
    fn from(e: ExportError) -> Self {
        WorkflowError::Export(e)
    }
}

impl ResponseError for WorkflowError {
    fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::InvalidRange
            | WorkflowError::EmptyReason
            | WorkflowError::UnknownEmployee(_)
            | WorkflowError::UnsupportedDocument(_) => StatusCode::BAD_REQUEST,
            WorkflowError::NotFound(_) | WorkflowError::DocumentMissing => StatusCode::NOT_FOUND,
            WorkflowError::Storage(_) | WorkflowError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => {
                "Something went wrong, Contact with system admin".to_string()
            }
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
