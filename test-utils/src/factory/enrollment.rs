//! Enrollment factory linking students to courses.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Enrolls a user in a course.
///
/// # Arguments
/// - `db` - Database connection
/// - `course_id` - Course ID
/// - `user_id` - Student's user ID
///
/// # Returns
/// - `Ok(entity::course_enrollment::Model)` - Created enrollment row
/// - `Err(DbErr)` - Database error, including a duplicate enrollment
pub async fn create_enrollment(
    db: &DatabaseConnection,
    course_id: i32,
    user_id: i32,
) -> Result<entity::course_enrollment::Model, DbErr> {
    entity::course_enrollment::ActiveModel {
        course_id: ActiveValue::Set(course_id),
        user_id: ActiveValue::Set(user_id),
        enrolled_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
