use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::activity::ActivityDto;

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct GenerateActivityDto {
    pub activity_type: Option<String>,
    pub course_content: Option<String>,
    pub course_id: Option<i32>,
    #[serde(default)]
    pub document_ids: Vec<i32>,
    pub web_resources: Option<String>,
    pub additional_prompt: Option<String>,
    pub time_limit: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct GeneratedActivityDto {
    pub message: String,
    #[schema(value_type = Object)]
    pub generated_activity: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct RefineActivityDto {
    pub refinement_prompt: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct RefinedActivityDto {
    pub message: String,
    #[schema(value_type = Object)]
    pub refined_activity: serde_json::Value,
    pub activity: ActivityDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AnalysisDto {
    pub message: String,
    #[schema(value_type = Object)]
    pub analysis: serde_json::Value,
}

/// One cluster of similar answers. Members are response IDs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ResponseGroupDto {
    pub group_id: u32,
    pub response_ids: Vec<i32>,
    pub representative: String,
    pub size: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResponseGroupsDto {
    pub groups: Vec<ResponseGroupDto>,
    pub total_responses: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct AiFeedbackRequestDto {
    pub student_response: Option<String>,
    pub correct_answer: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AiFeedbackDto {
    pub feedback: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct AskQuestionDto {
    pub question: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseAnswerDto {
    pub answer: String,
    pub question: String,
    pub course_id: i32,
    pub course_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct GeneralAnswerDto {
    pub answer: String,
    pub question: String,
}
