use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseDto {
    pub id: i32,
    pub course_code: String,
    pub course_name: String,
    pub description: Option<String>,
    pub teacher_id: i32,
    pub teacher_name: Option<String>,
    pub semester: String,
    pub academic_year: String,
    pub is_active: bool,
    pub student_count: u64,
    pub activity_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseListDto {
    pub courses: Vec<CourseDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseDetailDto {
    pub course: CourseDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseSavedDto {
    pub message: String,
    pub course: CourseDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct CreateCourseDto {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub description: Option<String>,
    pub semester: Option<String>,
    pub academic_year: Option<String>,
}

/// Partial course update. `course_code` is only honoured for admins.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateCourseDto {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub description: Option<String>,
    pub semester: Option<String>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
}
