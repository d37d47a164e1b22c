//! Course domain models and parameters.

use chrono::{DateTime, Utc};

use crate::model::course::CourseDto;

/// Course with the derived fields shown in listings.
///
/// `teacher_name`, `student_count` and `activity_count` are filled by
/// `CourseRepository::with_details`; a bare `from_entity` leaves them empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
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

impl Course {
    /// Converts an entity model to a course domain model without derived fields.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Course` - Domain model with zero counts and no teacher name
    pub fn from_entity(entity: entity::course::Model) -> Self {
        Self {
            id: entity.id,
            course_code: entity.course_code,
            course_name: entity.course_name,
            description: entity.description,
            teacher_id: entity.teacher_id,
            teacher_name: None,
            semester: entity.semester,
            academic_year: entity.academic_year,
            is_active: entity.is_active,
            student_count: 0,
            activity_count: 0,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Converts the course domain model to a DTO for API responses.
    pub fn into_dto(self) -> CourseDto {
        CourseDto {
            id: self.id,
            course_code: self.course_code,
            course_name: self.course_name,
            description: self.description,
            teacher_id: self.teacher_id,
            teacher_name: self.teacher_name,
            semester: self.semester,
            academic_year: self.academic_year,
            is_active: self.is_active,
            student_count: self.student_count,
            activity_count: self.activity_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Parameters for creating a course.
#[derive(Debug, Clone)]
pub struct CreateCourseParams {
    pub course_code: String,
    pub course_name: String,
    pub description: Option<String>,
    pub teacher_id: i32,
    pub semester: String,
    pub academic_year: String,
}

/// Partial course update. `course_code` is only ever set by admins.
#[derive(Debug, Clone, Default)]
pub struct UpdateCourseParams {
    pub id: i32,
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub description: Option<String>,
    pub semester: Option<String>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
}
