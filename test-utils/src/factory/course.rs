//! Course factory for creating test course entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test courses owned by a teacher.
pub struct CourseFactory<'a> {
    db: &'a DatabaseConnection,
    teacher_id: i32,
    course_code: String,
    course_name: String,
    description: Option<String>,
    semester: String,
    academic_year: String,
    is_active: bool,
}

impl<'a> CourseFactory<'a> {
    /// Creates a new CourseFactory with default values.
    ///
    /// Defaults:
    /// - course_code: `"COMP{id}"`
    /// - course_name: `"Course {id}"`
    /// - semester `"Fall"`, academic_year `"2025-2026"`, active
    pub fn new(db: &'a DatabaseConnection, teacher_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            teacher_id,
            course_code: format!("COMP{}", id),
            course_name: format!("Course {}", id),
            description: None,
            semester: "Fall".to_string(),
            academic_year: "2025-2026".to_string(),
            is_active: true,
        }
    }

    pub fn course_code(mut self, course_code: impl Into<String>) -> Self {
        self.course_code = course_code.into();
        self
    }

    pub fn course_name(mut self, course_name: impl Into<String>) -> Self {
        self.course_name = course_name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Builds and inserts the course entity into the database.
    pub async fn build(self) -> Result<entity::course::Model, DbErr> {
        let now = Utc::now();
        entity::course::ActiveModel {
            course_code: ActiveValue::Set(self.course_code),
            course_name: ActiveValue::Set(self.course_name),
            description: ActiveValue::Set(self.description),
            teacher_id: ActiveValue::Set(self.teacher_id),
            semester: ActiveValue::Set(self.semester),
            academic_year: ActiveValue::Set(self.academic_year),
            is_active: ActiveValue::Set(self.is_active),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active course with default values for the given teacher.
pub async fn create_course(
    db: &DatabaseConnection,
    teacher_id: i32,
) -> Result<entity::course::Model, DbErr> {
    CourseFactory::new(db, teacher_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::TestBuilder, factory};

    #[tokio::test]
    async fn creates_course_for_teacher() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_course_tables().build().await.unwrap();
        let db = &test.db;

        let teacher = factory::user::create_teacher(db).await?;
        let course = create_course(db, teacher.id).await?;

        assert_eq!(course.teacher_id, teacher.id);
        assert!(course.is_active);
        assert!(course.course_code.starts_with("COMP"));

        Ok(())
    }
}
