use crate::server::error::AppError;

/// Returns the trimmed value or a 400 naming the missing field.
pub fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    optional_text(value).ok_or_else(|| AppError::bad_request(format!("{} is required", field)))
}

/// Trims the value and treats blank strings as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
