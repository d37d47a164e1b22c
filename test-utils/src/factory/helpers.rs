//! Shared helper utilities for factory methods.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a teacher and an active course owned by that teacher.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok((teacher, course))` - Created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_course_with_teacher(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::course::Model), DbErr> {
    let teacher = crate::factory::user::create_teacher(db).await?;
    let course = crate::factory::course::create_course(db, teacher.id).await?;

    Ok((teacher, course))
}

/// Creates a student and enrolls them in the given course.
///
/// # Arguments
/// - `db` - Database connection
/// - `course_id` - Course to enroll the new student in
///
/// # Returns
/// - `Ok(student)` - Created student
/// - `Err(DbErr)` - Database error during creation
pub async fn create_enrolled_student(
    db: &DatabaseConnection,
    course_id: i32,
) -> Result<entity::user::Model, DbErr> {
    let student = crate::factory::user::create_student(db).await?;
    crate::factory::enrollment::create_enrollment(db, course_id, student.id).await?;

    Ok(student)
}
