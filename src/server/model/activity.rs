//! Activity domain models and parameters.

use chrono::{DateTime, Utc};
use entity::activity::{ActivityStatus, ActivityType};

use crate::model::activity::ActivityDto;

/// Default activity length when none is given.
pub const DEFAULT_DURATION_MINUTES: i32 = 10;

/// Teacher-authored learning task.
///
/// `course_name`, `creator_name` and `response_count` are filled by
/// `ActivityRepository::with_details`.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub course_id: i32,
    pub course_name: Option<String>,
    pub creator_id: i32,
    pub creator_name: Option<String>,
    pub config: Option<serde_json::Value>,
    pub is_ai_generated: bool,
    pub ai_prompt: Option<String>,
    pub ai_refined: bool,
    pub status: ActivityStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: i32,
    pub response_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Converts an entity model to an activity domain model without derived fields.
    pub fn from_entity(entity: entity::activity::Model) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            activity_type: entity.activity_type,
            course_id: entity.course_id,
            course_name: None,
            creator_id: entity.creator_id,
            creator_name: None,
            config: entity.config,
            is_ai_generated: entity.is_ai_generated,
            ai_prompt: entity.ai_prompt,
            ai_refined: entity.ai_refined,
            status: entity.status,
            start_time: entity.start_time,
            end_time: entity.end_time,
            duration_minutes: entity.duration_minutes,
            response_count: 0,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn into_dto(self) -> ActivityDto {
        ActivityDto {
            id: self.id,
            title: self.title,
            description: self.description,
            activity_type: self.activity_type,
            course_id: self.course_id,
            course_name: self.course_name,
            creator_id: self.creator_id,
            creator_name: self.creator_name,
            config: self.config,
            is_ai_generated: self.is_ai_generated,
            ai_prompt: self.ai_prompt,
            ai_refined: self.ai_refined,
            status: self.status,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_minutes: self.duration_minutes,
            response_count: self.response_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Parameters for creating an activity.
#[derive(Debug, Clone)]
pub struct CreateActivityParams {
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub course_id: i32,
    pub creator_id: i32,
    pub config: Option<serde_json::Value>,
    pub is_ai_generated: bool,
    pub duration_minutes: i32,
}

/// Partial activity update.
///
/// Also carries the lifecycle and AI refinement columns so start/stop and refine share
/// one update path.
#[derive(Debug, Clone, Default)]
pub struct UpdateActivityParams {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub config: Option<serde_json::Value>,
    pub duration_minutes: Option<i32>,
    pub status: Option<ActivityStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub ai_prompt: Option<String>,
    pub ai_refined: Option<bool>,
}

/// Listing filters. Every field narrows the result when set.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Restrict to these courses. `None` means every course.
    pub course_ids: Option<Vec<i32>>,
    pub creator_id: Option<i32>,
    pub course_id: Option<i32>,
    pub activity_type: Option<ActivityType>,
    pub status: Option<ActivityStatus>,
}
