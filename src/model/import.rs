use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single student in a JSON roster import.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ImportStudentDto {
    pub student_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ImportStudentsDto {
    #[serde(default)]
    pub students: Vec<ImportStudentDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ImportStudentsResultDto {
    pub message: String,
    pub imported_count: u32,
    pub errors: Vec<String>,
}

/// Outcome of a spreadsheet import. At most the first 20 row errors are returned.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ImportSummaryDto {
    pub message: String,
    pub imported_count: u32,
    pub updated_count: u32,
    pub enrolled_count: u32,
    pub skipped_count: u32,
    pub total_rows: u32,
    pub errors: Vec<String>,
}
