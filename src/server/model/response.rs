//! Activity response domain models.

use chrono::{DateTime, Utc};

use crate::model::response::ResponseDto;

/// A student's submission to an activity.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: i32,
    pub activity_id: i32,
    pub activity_title: Option<String>,
    pub student_id: i32,
    pub student_name: Option<String>,
    pub student_username: Option<String>,
    pub response_data: serde_json::Value,
    pub ai_analysis: Option<serde_json::Value>,
    pub similarity_score: Option<f64>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub time_spent_seconds: Option<i32>,
}

impl Response {
    pub fn from_entity(entity: entity::activity_response::Model) -> Self {
        Self {
            id: entity.id,
            activity_id: entity.activity_id,
            activity_title: None,
            student_id: entity.student_id,
            student_name: None,
            student_username: None,
            response_data: entity.response_data,
            ai_analysis: entity.ai_analysis,
            similarity_score: entity.similarity_score,
            score: entity.score,
            feedback: entity.feedback,
            submitted_at: entity.submitted_at,
            time_spent_seconds: entity.time_spent_seconds,
        }
    }

    pub fn into_dto(self) -> ResponseDto {
        ResponseDto {
            id: self.id,
            activity_id: self.activity_id,
            activity_title: self.activity_title,
            student_id: self.student_id,
            student_name: self.student_name,
            student_username: self.student_username,
            response_data: self.response_data,
            ai_analysis: self.ai_analysis,
            similarity_score: self.similarity_score,
            score: self.score,
            feedback: self.feedback,
            submitted_at: self.submitted_at,
            time_spent_seconds: self.time_spent_seconds,
        }
    }

    /// Text used for AI prompts and lexical grouping.
    ///
    /// Prefers the `content`, then `answer` string fields of the response payload and
    /// falls back to the serialized JSON.
    pub fn text_content(&self) -> String {
        ["content", "answer", "text"]
            .iter()
            .find_map(|key| self.response_data.get(*key))
            .map(|value| match value.as_str() {
                Some(text) => text.to_string(),
                None => value.to_string(),
            })
            .unwrap_or_else(|| self.response_data.to_string())
    }
}

/// Parameters for recording a submission.
#[derive(Debug, Clone)]
pub struct CreateResponseParams {
    pub activity_id: i32,
    pub student_id: i32,
    pub response_data: serde_json::Value,
    pub time_spent_seconds: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn response(data: serde_json::Value) -> Response {
        Response {
            id: 1,
            activity_id: 1,
            activity_title: None,
            student_id: 1,
            student_name: None,
            student_username: None,
            response_data: data,
            ai_analysis: None,
            similarity_score: None,
            score: None,
            feedback: None,
            submitted_at: Utc::now(),
            time_spent_seconds: None,
        }
    }

    #[test]
    fn text_content_prefers_content_field() {
        let r = response(json!({"content": "ownership moves values", "answer": "B"}));
        assert_eq!(r.text_content(), "ownership moves values");
    }

    #[test]
    fn text_content_falls_back_to_json() {
        let r = response(json!({"choice": 2}));
        assert_eq!(r.text_content(), r#"{"choice":2}"#);
    }

    #[test]
    fn non_string_answer_is_serialized() {
        let r = response(json!({"answer": [1, 3]}));
        assert_eq!(r.text_content(), "[1,3]");
    }
}
