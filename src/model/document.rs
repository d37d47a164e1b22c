use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct DocumentDto {
    pub id: i32,
    pub course_id: i32,
    pub course_name: Option<String>,
    pub uploader_id: i32,
    pub uploader_name: Option<String>,
    pub filename: String,
    pub file_size: i64,
    pub file_size_mb: f64,
    pub file_type: String,
    /// Falls back to the original filename when no title was given.
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub download_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct DocumentListDto {
    pub documents: Vec<DocumentDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct DocumentDetailDto {
    pub document: DocumentDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct DocumentSavedDto {
    pub message: String,
    pub document: DocumentDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateDocumentDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
