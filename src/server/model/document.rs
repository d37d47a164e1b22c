//! Course document domain models.

use chrono::{DateTime, Utc};

use crate::model::document::DocumentDto;

/// Uploads must use one of these extensions.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "txt", "zip", "rar",
];

/// Largest accepted upload in bytes.
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Metadata of a file stored in object storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i32,
    pub course_id: i32,
    pub course_name: Option<String>,
    pub uploader_id: i32,
    pub uploader_name: Option<String>,
    /// Sanitized original filename shown to users.
    pub filename: String,
    /// Random name the object is stored under.
    pub stored_filename: String,
    /// Object key inside the bucket, `{course_id}/{stored_filename}`.
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub download_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn from_entity(entity: entity::document::Model) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            course_name: None,
            uploader_id: entity.uploader_id,
            uploader_name: None,
            filename: entity.filename,
            stored_filename: entity.stored_filename,
            file_path: entity.file_path,
            file_size: entity.file_size,
            file_type: entity.file_type,
            title: entity.title,
            description: entity.description,
            is_active: entity.is_active,
            download_count: entity.download_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Converts to the API shape, falling back to the filename when no title was given.
    pub fn into_dto(self) -> DocumentDto {
        let file_size_mb = file_size_mb(self.file_size);
        let title = self.title.unwrap_or_else(|| self.filename.clone());

        DocumentDto {
            id: self.id,
            course_id: self.course_id,
            course_name: self.course_name,
            uploader_id: self.uploader_id,
            uploader_name: self.uploader_name,
            filename: self.filename,
            file_size: self.file_size,
            file_size_mb,
            file_type: self.file_type,
            title,
            description: self.description,
            is_active: self.is_active,
            download_count: self.download_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Title if set, otherwise the filename.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.filename)
    }
}

/// File size in MiB rounded to two decimals.
pub fn file_size_mb(bytes: i64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// Parameters for recording an uploaded document.
#[derive(Debug, Clone)]
pub struct CreateDocumentParams {
    pub course_id: i32,
    pub uploader_id: i32,
    pub filename: String,
    pub stored_filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentParams {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_size_to_two_decimals() {
        assert_eq!(file_size_mb(1_572_864), 1.5);
        assert_eq!(file_size_mb(1_000_000), 0.95);
        assert_eq!(file_size_mb(0), 0.0);
    }
}
