//! Course-scoped access checks shared by the domain services.
//!
//! Lookups fail with 404 before any permission check, so a caller learns that a resource
//! is missing before learning that they may not see it.

use sea_orm::ConnectionTrait;

use crate::server::{
    data::{
        activity::ActivityRepository, course::CourseRepository, enrollment::EnrollmentRepository,
    },
    error::{auth::AuthError, AppError},
    model::{activity::Activity, course::Course, user::User},
};

pub async fn load_course<C: ConnectionTrait>(db: &C, course_id: i32) -> Result<Course, AppError> {
    CourseRepository::new(db)
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))
}

pub async fn load_activity<C: ConnectionTrait>(
    db: &C,
    activity_id: i32,
) -> Result<Activity, AppError> {
    ActivityRepository::new(db)
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| AppError::not_found("Activity not found"))
}

pub fn denied(user: &User, reason: impl Into<String>) -> AppError {
    AuthError::AccessDenied(user.id, reason.into()).into()
}

/// Whether the user is the teacher who owns the course.
pub fn owns_course(user: &User, course: &Course) -> bool {
    user.is_teacher() && course.teacher_id == user.id
}

/// Requires the caller to be the teacher who owns the course.
pub fn ensure_course_owner(user: &User, course: &Course) -> Result<(), AppError> {
    if owns_course(user, course) {
        Ok(())
    } else {
        Err(denied(user, format!("not the teacher of course {}", course.id)))
    }
}

/// Requires the caller to be the teacher who created the activity.
pub fn ensure_activity_creator(user: &User, activity: &Activity) -> Result<(), AppError> {
    if user.is_teacher() && activity.creator_id == user.id {
        Ok(())
    } else {
        Err(denied(user, format!("not the creator of activity {}", activity.id)))
    }
}

/// Whether the user may read course content.
///
/// # Arguments
/// - `user` - Caller
/// - `course` - Course being accessed
/// - `allow_admin` - Whether admins pass without owning or joining the course
///
/// # Returns
/// - `Ok(true)` - Owning teacher, enrolled student, or admin when allowed
/// - `Ok(false)` - Any other caller
/// - `Err(AppError)` - Database error during the enrollment lookup
pub async fn can_view_course<C: ConnectionTrait>(
    db: &C,
    user: &User,
    course: &Course,
    allow_admin: bool,
) -> Result<bool, AppError> {
    if user.is_admin() {
        return Ok(allow_admin);
    }
    if user.is_teacher() {
        return Ok(course.teacher_id == user.id);
    }

    Ok(EnrollmentRepository::new(db)
        .is_enrolled(course.id, user.id)
        .await?)
}

pub async fn ensure_course_viewer<C: ConnectionTrait>(
    db: &C,
    user: &User,
    course: &Course,
    allow_admin: bool,
) -> Result<(), AppError> {
    if can_view_course(db, user, course, allow_admin).await? {
        Ok(())
    } else {
        Err(denied(user, format!("no access to course {}", course.id)))
    }
}

/// Creator teacher, enrolled student, or admin.
pub async fn ensure_activity_viewer<C: ConnectionTrait>(
    db: &C,
    user: &User,
    activity: &Activity,
) -> Result<(), AppError> {
    let allowed = if user.is_admin() {
        true
    } else if user.is_teacher() {
        activity.creator_id == user.id
    } else {
        EnrollmentRepository::new(db)
            .is_enrolled(activity.course_id, user.id)
            .await?
    };

    if allowed {
        Ok(())
    } else {
        Err(denied(user, format!("no access to activity {}", activity.id)))
    }
}
