//! Activity factory for creating test activities.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use entity::activity::{ActivityStatus, ActivityType};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating activities inside a course.
pub struct ActivityFactory<'a> {
    db: &'a DatabaseConnection,
    course_id: i32,
    creator_id: i32,
    title: String,
    activity_type: ActivityType,
    status: ActivityStatus,
    config: Option<serde_json::Value>,
    is_ai_generated: bool,
    duration_minutes: i32,
    created_at: DateTime<Utc>,
}

impl<'a> ActivityFactory<'a> {
    /// Creates a new ActivityFactory.
    ///
    /// Defaults: title `"Activity {id}"`, type quiz, status draft, 10 minutes.
    pub fn new(db: &'a DatabaseConnection, course_id: i32, creator_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            course_id,
            creator_id,
            title: format!("Activity {}", id),
            activity_type: ActivityType::Quiz,
            status: ActivityStatus::Draft,
            config: None,
            is_ai_generated: false,
            duration_minutes: 10,
            created_at: Utc::now(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn activity_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = activity_type;
        self
    }

    pub fn status(mut self, status: ActivityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn ai_generated(mut self, is_ai_generated: bool) -> Self {
        self.is_ai_generated = is_ai_generated;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the activity entity into the database.
    pub async fn build(self) -> Result<entity::activity::Model, DbErr> {
        entity::activity::ActiveModel {
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(None),
            activity_type: ActiveValue::Set(self.activity_type),
            course_id: ActiveValue::Set(self.course_id),
            creator_id: ActiveValue::Set(self.creator_id),
            config: ActiveValue::Set(self.config),
            is_ai_generated: ActiveValue::Set(self.is_ai_generated),
            ai_prompt: ActiveValue::Set(None),
            ai_refined: ActiveValue::Set(false),
            status: ActiveValue::Set(self.status),
            start_time: ActiveValue::Set(None),
            end_time: ActiveValue::Set(None),
            duration_minutes: ActiveValue::Set(self.duration_minutes),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a draft quiz activity in the course.
pub async fn create_activity(
    db: &DatabaseConnection,
    course_id: i32,
    creator_id: i32,
) -> Result<entity::activity::Model, DbErr> {
    ActivityFactory::new(db, course_id, creator_id).build().await
}
