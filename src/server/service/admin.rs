//! Administration of users, courses and activities across the whole system.

use chrono::{Duration, Utc};
use entity::user::Role;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        admin::{AdminStatsDto, UpdateUserDto},
        course::UpdateCourseDto,
        user::RegisterDto,
    },
    server::{
        data::{
            activity::ActivityRepository, course::CourseRepository, document::DocumentRepository,
            response::ResponseRepository, user::UserRepository,
        },
        error::AppError,
        model::{
            activity::{Activity, ActivityFilter},
            course::{Course, UpdateCourseParams},
            user::{PaginatedUsers, UpdateUserParams, User},
        },
        service::{
            access::{load_activity, load_course},
            auth::AuthService,
            storage::ObjectStorage,
        },
        util::{
            email::validate_email,
            password::hash_password,
            validate::{optional_text, required_text},
        },
    },
};

/// Page size of the user listing when none is requested.
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Largest accepted page size.
pub const MAX_PER_PAGE: u64 = 100;

/// Window used for the "active users" and "recent activities" statistics.
const RECENT_DAYS: i64 = 7;

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
    email_domain: &'a str,
}

impl<'a> AdminService<'a> {
    pub fn new(db: &'a DatabaseConnection, email_domain: &'a str) -> Self {
        Self { db, email_domain }
    }

    /// Lists users newest first, one page at a time.
    ///
    /// # Arguments
    /// - `role` - Optional role filter
    /// - `page` - 1-based page, defaults to 1
    /// - `per_page` - Page size, defaults to 20 and is capped at 100
    ///
    /// # Returns
    /// - `Ok(PaginatedUsers)` - Requested page with totals
    /// - `Err(AppError::BadRequest)` - Unknown role filter
    pub async fn list_users(
        &self,
        role: Option<String>,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> Result<PaginatedUsers, AppError> {
        let role = optional_text(role)
            .map(|r| r.parse::<Role>())
            .transpose()
            .map_err(AppError::BadRequest)?;
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

        let (users, total) = UserRepository::new(self.db)
            .get_paginated(role, page, per_page)
            .await?;

        Ok(PaginatedUsers {
            users,
            total,
            pages: total.div_ceil(per_page),
            current_page: page,
        })
    }

    /// Creates an account of any role. Students must carry a student ID; other roles
    /// never keep one.
    pub async fn create_user(&self, mut payload: RegisterDto) -> Result<User, AppError> {
        let role = required_text(payload.role.clone(), "role")?;

        if role.parse::<Role>() == Ok(Role::Student) {
            if optional_text(payload.student_id.clone()).is_none() {
                return Err(AppError::bad_request("Students must have a student_id"));
            }
        } else {
            payload.student_id = None;
        }

        AuthService::new(self.db, self.email_domain)
            .register(payload)
            .await
    }

    pub async fn get_user(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates any account. An unrecognised role is ignored rather than rejected.
    ///
    /// # Returns
    /// - `Ok(User)` - Updated account
    /// - `Err(AppError::BadRequest)` - Invalid or taken email, or taken student ID
    /// - `Err(AppError::NotFound)` - No such user
    pub async fn update_user(
        &self,
        user_id: i32,
        payload: UpdateUserDto,
    ) -> Result<User, AppError> {
        let user = self.get_user(user_id).await?;
        let repo = UserRepository::new(self.db);

        let email = match optional_text(payload.email) {
            Some(email) => {
                let email =
                    validate_email(&email, self.email_domain).map_err(AppError::BadRequest)?;
                if let Some(holder) = repo.find_by_email(&email).await? {
                    if holder.id != user.id {
                        return Err(AppError::bad_request("Email already exists"));
                    }
                }
                Some(email)
            }
            None => None,
        };

        let student_id = optional_text(payload.student_id);
        if let Some(student_id) = &student_id {
            if let Some(holder) = repo.find_by_student_id(student_id).await? {
                if holder.id != user.id {
                    return Err(AppError::bad_request("Student ID already exists"));
                }
            }
        }

        let password_hash = match optional_text(payload.password) {
            Some(password) => Some(hash_password(&password)?),
            None => None,
        };

        let updated = repo
            .update(UpdateUserParams {
                id: user.id,
                email,
                role: payload.role.and_then(|r| r.parse::<Role>().ok()),
                student_id,
                full_name: optional_text(payload.full_name),
                department: payload.department,
                password_hash,
            })
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        tracing::info!("Admin updated user {}", updated.username);

        Ok(updated)
    }

    /// Deletes an account other than the caller's own.
    ///
    /// Courses the user teaches and documents they uploaded are removed with the account,
    /// so their stored objects are removed first on a best effort basis.
    pub async fn delete_user(
        &self,
        admin: &User,
        user_id: i32,
        storage: &dyn ObjectStorage,
    ) -> Result<(), AppError> {
        if admin.id == user_id {
            return Err(AppError::bad_request("You cannot delete your own account"));
        }

        let user = self.get_user(user_id).await?;

        let paths = DocumentRepository::new(self.db)
            .get_file_paths_by_owner(user.id)
            .await?;
        if !paths.is_empty() {
            if let Err(err) = storage.remove(&paths).await {
                tracing::warn!(
                    "Failed to remove {} stored documents of user {}: {}",
                    paths.len(),
                    user.id,
                    err
                );
            }
        }

        UserRepository::new(self.db).delete(user.id).await?;

        tracing::info!("Admin {} deleted user {}", admin.id, user.username);

        Ok(())
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        let repo = CourseRepository::new(self.db);
        let courses = repo.get_all(false).await?;

        Ok(repo.with_details(courses).await?)
    }

    pub async fn get_course(&self, course_id: i32) -> Result<Course, AppError> {
        let course = load_course(self.db, course_id).await?;

        self.detailed_course(course).await
    }

    /// Updates any course, including its code, which must stay unique.
    pub async fn update_course(
        &self,
        course_id: i32,
        payload: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let course = load_course(self.db, course_id).await?;
        let repo = CourseRepository::new(self.db);

        let course_code = optional_text(payload.course_code);
        if let Some(code) = &course_code {
            if let Some(holder) = repo.find_by_code(code).await? {
                if holder.id != course.id {
                    return Err(AppError::bad_request("Course code already exists"));
                }
            }
        }

        let course = repo
            .update(UpdateCourseParams {
                id: course.id,
                course_code,
                course_name: optional_text(payload.course_name),
                description: payload.description,
                semester: optional_text(payload.semester),
                academic_year: optional_text(payload.academic_year),
                is_active: payload.is_active,
            })
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        self.detailed_course(course).await
    }

    /// Deletes a course and everything under it. Stored document objects are removed
    /// first on a best effort basis.
    pub async fn delete_course(
        &self,
        course_id: i32,
        storage: &dyn ObjectStorage,
    ) -> Result<(), AppError> {
        let course = load_course(self.db, course_id).await?;

        let paths = DocumentRepository::new(self.db)
            .get_file_paths_by_course(course.id)
            .await?;
        if !paths.is_empty() {
            if let Err(err) = storage.remove(&paths).await {
                tracing::warn!(
                    "Failed to remove {} stored documents of course {}: {}",
                    paths.len(),
                    course.id,
                    err
                );
            }
        }

        CourseRepository::new(self.db).delete(course.id).await?;

        tracing::info!("Admin deleted course {}", course.course_code);

        Ok(())
    }

    pub async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        let repo = ActivityRepository::new(self.db);
        let activities = repo.list(ActivityFilter::default(), None).await?;

        Ok(repo.with_details(activities).await?)
    }

    pub async fn delete_activity(&self, activity_id: i32) -> Result<(), AppError> {
        let activity = load_activity(self.db, activity_id).await?;
        ActivityRepository::new(self.db).delete(activity.id).await?;

        Ok(())
    }

    /// System wide totals plus activity over the last seven days.
    pub async fn stats(&self) -> Result<AdminStatsDto, AppError> {
        let users = UserRepository::new(self.db);
        let activities = ActivityRepository::new(self.db);
        let since = Utc::now() - Duration::days(RECENT_DAYS);

        Ok(AdminStatsDto {
            total_users: users.count(None).await?,
            total_teachers: users.count(Some(Role::Teacher)).await?,
            total_students: users.count(Some(Role::Student)).await?,
            total_courses: CourseRepository::new(self.db).count(None).await?,
            total_activities: activities.count(ActivityFilter::default()).await?,
            total_responses: ResponseRepository::new(self.db).count(None).await?,
            active_users: users.count_logged_in_since(since).await?,
            recent_activities: activities.count_created_since(since).await?,
            ai_activities: activities.count_ai_generated().await?,
        })
    }

    async fn detailed_course(&self, course: Course) -> Result<Course, AppError> {
        CourseRepository::new(self.db)
            .with_details(vec![course])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Course not found"))
    }
}
