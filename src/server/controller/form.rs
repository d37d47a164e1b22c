//! Multipart form parsing shared by the upload and spreadsheet import endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::server::{
    error::{import::ImportError, AppError},
    model::import::ImportRow,
    service::document::UploadedFile,
    util::excel::{is_excel_filename, read_rows},
};

/// A parsed multipart body: the `file` part plus every text field.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Removes a text field, treating blank values as absent.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields
            .remove(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Reads the whole multipart body into memory.
///
/// A part with a filename, or named `file`, is taken as the upload; the last one wins.
/// Every other part is read as text.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" || field.file_name().is_some() {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?.to_vec();

            form.file = Some(UploadedFile {
                filename,
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Reads an uploaded `.xlsx`/`.xls` file into header keyed rows.
///
/// # Arguments
/// - `multipart` - Request body carrying a `file` part
/// - `required` - Columns the header row must contain
///
/// # Returns
/// - `Ok(Vec<ImportRow>)` - Data rows with their sheet line numbers
/// - `Err(ImportError)` - No file, wrong extension, unreadable workbook or missing columns
pub async fn read_spreadsheet(
    multipart: Multipart,
    required: &[&str],
) -> Result<Vec<ImportRow>, AppError> {
    let file = read_upload(multipart)
        .await?
        .file
        .filter(|file| !file.filename.is_empty())
        .ok_or(ImportError::MissingFile)?;

    if !is_excel_filename(&file.filename) {
        return Err(ImportError::UnsupportedFile.into());
    }

    Ok(read_rows(file.bytes, required)?)
}
