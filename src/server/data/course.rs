//! Course data repository.
//!
//! Provides `CourseRepository` for course CRUD, role based course listings and the
//! bulk loading of derived fields (teacher name, student and activity counts).

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::course::{Course, CreateCourseParams, UpdateCourseParams};

/// Repository providing database operations for courses.
pub struct CourseRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CourseRepository<'a, C> {
    /// Creates a new CourseRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection or transaction
    ///
    /// # Returns
    /// - `CourseRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new active course.
    ///
    /// # Arguments
    /// - `params` - Course fields including the owning teacher
    ///
    /// # Returns
    /// - `Ok(Course)` - The created course without derived fields
    /// - `Err(DbErr)` - Insert failed, including a duplicate course code
    pub async fn create(&self, params: CreateCourseParams) -> Result<Course, DbErr> {
        let now = Utc::now();

        let entity = entity::course::ActiveModel {
            course_code: ActiveValue::Set(params.course_code),
            course_name: ActiveValue::Set(params.course_name),
            description: ActiveValue::Set(params.description),
            teacher_id: ActiveValue::Set(params.teacher_id),
            semester: ActiveValue::Set(params.semester),
            academic_year: ActiveValue::Set(params.academic_year),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Course::from_entity(entity))
    }

    /// Finds a course by ID.
    ///
    /// # Arguments
    /// - `id` - Course ID
    ///
    /// # Returns
    /// - `Ok(Some(Course))` - Course found, derived fields not loaded
    /// - `Ok(None)` - No course with that ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Course>, DbErr> {
        let entity = entity::prelude::Course::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Course::from_entity))
    }

    /// Finds a course by its unique code.
    pub async fn find_by_code(&self, course_code: &str) -> Result<Option<Course>, DbErr> {
        let entity = entity::prelude::Course::find()
            .filter(entity::course::Column::CourseCode.eq(course_code))
            .one(self.db)
            .await?;

        Ok(entity.map(Course::from_entity))
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// # Returns
    /// - `Ok(Some(Course))` - Updated course
    /// - `Ok(None)` - No course with that ID
    /// - `Err(DbErr)` - Database error, including a duplicate course code
    pub async fn update(&self, params: UpdateCourseParams) -> Result<Option<Course>, DbErr> {
        let Some(entity) = entity::prelude::Course::find_by_id(params.id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();

        if let Some(course_code) = params.course_code {
            active.course_code = ActiveValue::Set(course_code);
        }
        if let Some(course_name) = params.course_name {
            active.course_name = ActiveValue::Set(course_name);
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(semester) = params.semester {
            active.semester = ActiveValue::Set(semester);
        }
        if let Some(academic_year) = params.academic_year {
            active.academic_year = ActiveValue::Set(academic_year);
        }
        if let Some(is_active) = params.is_active {
            active.is_active = ActiveValue::Set(is_active);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Course::from_entity(entity)))
    }

    /// Deletes a course; enrollments, activities, documents and forum content cascade.
    ///
    /// # Returns
    /// - `Ok(true)` - Course deleted
    /// - `Ok(false)` - No course with that ID
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Course::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Courses taught by `teacher_id`, newest first.
    pub async fn get_by_teacher(&self, teacher_id: i32) -> Result<Vec<Course>, DbErr> {
        let entities = entity::prelude::Course::find()
            .filter(entity::course::Column::TeacherId.eq(teacher_id))
            .order_by_desc(entity::course::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Course::from_entity).collect())
    }

    /// Courses the user is enrolled in, newest first.
    pub async fn get_enrolled(&self, user_id: i32) -> Result<Vec<Course>, DbErr> {
        let course_ids: Vec<i32> = entity::prelude::CourseEnrollment::find()
            .select_only()
            .column(entity::course_enrollment::Column::CourseId)
            .filter(entity::course_enrollment::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.db)
            .await?;

        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::Course::find()
            .filter(entity::course::Column::Id.is_in(course_ids))
            .order_by_desc(entity::course::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Course::from_entity).collect())
    }

    /// Every course, optionally restricted to active ones, newest first.
    pub async fn get_all(&self, active_only: bool) -> Result<Vec<Course>, DbErr> {
        let mut query = entity::prelude::Course::find();
        if active_only {
            query = query.filter(entity::course::Column::IsActive.eq(true));
        }

        let entities = query
            .order_by_desc(entity::course::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Course::from_entity).collect())
    }

    /// Counts all courses, or those of one teacher.
    pub async fn count(&self, teacher_id: Option<i32>) -> Result<u64, DbErr> {
        let mut query = entity::prelude::Course::find();
        if let Some(teacher_id) = teacher_id {
            query = query.filter(entity::course::Column::TeacherId.eq(teacher_id));
        }

        query.count(self.db).await
    }

    /// Fills teacher names, student counts and activity counts for a batch of courses.
    ///
    /// Runs three queries regardless of batch size.
    ///
    /// # Arguments
    /// - `courses` - Courses loaded by any of the other methods
    ///
    /// # Returns
    /// - `Ok(Vec<Course>)` - Same courses in the same order with derived fields set
    /// - `Err(DbErr)` - Database error during one of the lookups
    pub async fn with_details(&self, mut courses: Vec<Course>) -> Result<Vec<Course>, DbErr> {
        if courses.is_empty() {
            return Ok(courses);
        }

        let course_ids: Vec<i32> = courses.iter().map(|c| c.id).collect();
        let teacher_ids: Vec<i32> = courses.iter().map(|c| c.teacher_id).collect();

        let teachers: HashMap<i32, String> = entity::prelude::User::find()
            .select_only()
            .columns([entity::user::Column::Id, entity::user::Column::FullName])
            .filter(entity::user::Column::Id.is_in(teacher_ids))
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        let enrollments: Vec<i32> = entity::prelude::CourseEnrollment::find()
            .select_only()
            .column(entity::course_enrollment::Column::CourseId)
            .filter(entity::course_enrollment::Column::CourseId.is_in(course_ids.clone()))
            .into_tuple()
            .all(self.db)
            .await?;

        let activities: Vec<i32> = entity::prelude::Activity::find()
            .select_only()
            .column(entity::activity::Column::CourseId)
            .filter(entity::activity::Column::CourseId.is_in(course_ids))
            .into_tuple()
            .all(self.db)
            .await?;

        let student_counts = tally(enrollments);
        let activity_counts = tally(activities);

        for course in courses.iter_mut() {
            course.teacher_name = teachers.get(&course.teacher_id).cloned();
            course.student_count = student_counts.get(&course.id).copied().unwrap_or(0);
            course.activity_count = activity_counts.get(&course.id).copied().unwrap_or(0);
        }

        Ok(courses)
    }
}

/// Counts occurrences of each key.
pub(crate) fn tally(keys: Vec<i32>) -> HashMap<i32, u64> {
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
