use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum ImportError {
    /// Upload is not an `.xlsx` / `.xls` file.
    #[error("Only .xlsx and .xls files are supported")]
    UnsupportedFile,

    /// No `file` field was present in the multipart body.
    #[error("No file uploaded")]
    MissingFile,

    /// The workbook could not be opened or has no readable sheet.
    #[error("Failed to read Excel file: {0}")]
    Spreadsheet(String),

    /// Header row lacks one or more required columns.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The first sheet has no header row.
    #[error("Excel file is empty")]
    EmptySheet,
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

/// All import errors are caused by the uploaded file and map to 400 Bad Request.
impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
