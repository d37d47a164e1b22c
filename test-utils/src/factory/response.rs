//! Activity response factory.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use serde_json::json;

/// Factory for creating a student's response to an activity.
pub struct ResponseFactory<'a> {
    db: &'a DatabaseConnection,
    activity_id: i32,
    student_id: i32,
    response_data: serde_json::Value,
    score: Option<f64>,
    time_spent_seconds: Option<i32>,
    submitted_at: DateTime<Utc>,
}

impl<'a> ResponseFactory<'a> {
    /// Creates a new ResponseFactory with `{"content": "answer"}` as the payload.
    pub fn new(db: &'a DatabaseConnection, activity_id: i32, student_id: i32) -> Self {
        Self {
            db,
            activity_id,
            student_id,
            response_data: json!({ "content": "answer" }),
            score: None,
            time_spent_seconds: None,
            submitted_at: Utc::now(),
        }
    }

    pub fn response_data(mut self, response_data: serde_json::Value) -> Self {
        self.response_data = response_data;
        self
    }

    /// Shorthand for a `{"content": ...}` payload.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.response_data = json!({ "content": content.into() });
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn time_spent_seconds(mut self, seconds: i32) -> Self {
        self.time_spent_seconds = Some(seconds);
        self
    }

    pub fn submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    /// Builds and inserts the response entity into the database.
    pub async fn build(self) -> Result<entity::activity_response::Model, DbErr> {
        entity::activity_response::ActiveModel {
            activity_id: ActiveValue::Set(self.activity_id),
            student_id: ActiveValue::Set(self.student_id),
            response_data: ActiveValue::Set(self.response_data),
            ai_analysis: ActiveValue::Set(None),
            similarity_score: ActiveValue::Set(None),
            score: ActiveValue::Set(self.score),
            feedback: ActiveValue::Set(None),
            submitted_at: ActiveValue::Set(self.submitted_at),
            time_spent_seconds: ActiveValue::Set(self.time_spent_seconds),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a default response from the student to the activity.
pub async fn create_response(
    db: &DatabaseConnection,
    activity_id: i32,
    student_id: i32,
) -> Result<entity::activity_response::Model, DbErr> {
    ResponseFactory::new(db, activity_id, student_id).build().await
}
