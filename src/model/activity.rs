use chrono::{DateTime, Utc};
use entity::activity::{ActivityStatus, ActivityType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ActivityDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub course_id: i32,
    pub course_name: Option<String>,
    pub creator_id: i32,
    pub creator_name: Option<String>,
    #[schema(value_type = Option<Object>)]
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

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ActivityListDto {
    pub activities: Vec<ActivityDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ActivityDetailDto {
    pub activity: ActivityDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ActivitySavedDto {
    pub message: String,
    pub activity: ActivityDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct CreateActivityDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub activity_type: Option<String>,
    pub course_id: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub is_ai_generated: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub config: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateActivityDto {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub config: Option<serde_json::Value>,
    pub duration_minutes: Option<i32>,
    pub status: Option<String>,
}

/// Catalogue entry describing one activity type.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ActivityTypeDto {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ActivityTypesDto {
    pub types: Vec<ActivityTypeDto>,
}
