use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResponseDto {
    pub id: i32,
    pub activity_id: i32,
    pub activity_title: Option<String>,
    pub student_id: i32,
    pub student_name: Option<String>,
    pub student_username: Option<String>,
    #[schema(value_type = Object)]
    pub response_data: serde_json::Value,
    #[schema(value_type = Option<Object>)]
    pub ai_analysis: Option<serde_json::Value>,
    pub similarity_score: Option<f64>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub time_spent_seconds: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct SubmitResponseDto {
    pub activity_id: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub response_data: Option<serde_json::Value>,
    pub time_spent_seconds: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResponseSavedDto {
    pub message: String,
    pub response: ResponseDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResponseDetailDto {
    pub response: ResponseDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResponseListDto {
    pub responses: Vec<ResponseDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct FeedbackDto {
    pub feedback: Option<String>,
    pub score: Option<f64>,
}
