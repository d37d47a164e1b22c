use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum StorageError {
    /// Transport failure talking to the storage service.
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Storage service answered with a non-success status.
    #[error("Storage service returned {status}: {body}")]
    Status {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body, usually a JSON error
        body: String,
    },

    /// Requested object does not exist in the bucket.
    #[error("File not found in storage: {0}")]
    ObjectNotFound(String),

    /// Storage service answered with a body we could not interpret.
    #[error("Unexpected storage response: {0}")]
    InvalidResponse(String),
}

/// Converts storage errors into HTTP responses.
///
/// Missing objects become 404; every other failure is a 500 whose message names the
/// storage failure so the uploader knows the file was not saved.
impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        match self {
            Self::ObjectNotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorDto {
                    error: "File not found in storage".to_string(),
                }),
            )
                .into_response(),
            err => {
                tracing::error!("{}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto {
                        error: format!("Storage operation failed: {}", err),
                    }),
                )
                    .into_response()
            }
        }
    }
}
