//! Course enrollment repository.
//!
//! Enrollments are keyed by `(course_id, user_id)`, so the table itself rejects
//! duplicates.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::user::User;

/// Repository providing database operations for course enrollments.
pub struct EnrollmentRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EnrollmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Enrolls a user in a course.
    ///
    /// # Arguments
    /// - `course_id` - Course to enroll in
    /// - `user_id` - Enrolling user
    ///
    /// # Returns
    /// - `Ok(())` - Enrollment created
    /// - `Err(DbErr)` - Database error, including an existing enrollment
    pub async fn enroll(&self, course_id: i32, user_id: i32) -> Result<(), DbErr> {
        entity::course_enrollment::ActiveModel {
            course_id: ActiveValue::Set(course_id),
            user_id: ActiveValue::Set(user_id),
            enrolled_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Removes an enrollment.
    ///
    /// # Returns
    /// - `Ok(true)` - Enrollment removed
    /// - `Ok(false)` - User was not enrolled
    /// - `Err(DbErr)` - Database error during delete
    pub async fn unenroll(&self, course_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::CourseEnrollment::delete_by_id((course_id, user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Whether the user is enrolled in the course.
    pub async fn is_enrolled(&self, course_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let enrollment = entity::prelude::CourseEnrollment::find_by_id((course_id, user_id))
            .one(self.db)
            .await?;

        Ok(enrollment.is_some())
    }

    /// IDs of the courses the user is enrolled in.
    pub async fn get_course_ids(&self, user_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::CourseEnrollment::find()
            .select_only()
            .column(entity::course_enrollment::Column::CourseId)
            .filter(entity::course_enrollment::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Enrolled users of a course ordered by enrollment time.
    ///
    /// # Arguments
    /// - `course_id` - Course to list
    ///
    /// # Returns
    /// - `Ok(Vec<User>)` - Enrolled users
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_students(&self, course_id: i32) -> Result<Vec<User>, DbErr> {
        let user_ids: Vec<i32> = entity::prelude::CourseEnrollment::find()
            .select_only()
            .column(entity::course_enrollment::Column::UserId)
            .filter(entity::course_enrollment::Column::CourseId.eq(course_id))
            .order_by_asc(entity::course_enrollment::Column::EnrolledAt)
            .into_tuple()
            .all(self.db)
            .await?;

        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut users: Vec<User> = entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(user_ids.clone()))
            .all(self.db)
            .await?
            .into_iter()
            .map(User::from_entity)
            .collect();

        users.sort_by_key(|u| user_ids.iter().position(|id| *id == u.id));

        Ok(users)
    }

    /// Number of users enrolled in the course.
    pub async fn count_students(&self, course_id: i32) -> Result<u64, DbErr> {
        entity::prelude::CourseEnrollment::find()
            .filter(entity::course_enrollment::Column::CourseId.eq(course_id))
            .count(self.db)
            .await
    }
}
