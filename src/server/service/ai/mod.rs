//! AI features built on a chat completion API.
//!
//! `AiService` never fails outright: when the API is unreachable or unconfigured each
//! feature degrades to a structured fallback so handlers can still answer.

pub mod client;
pub mod extract;
pub mod grouping;
pub mod prompt;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    model::ai::ResponseGroupDto,
    server::{
        error::ai::AiError,
        service::ai::{
            grouping::GroupInput,
            prompt::{CourseContext, GenerationRequest},
        },
    },
};

const GENERATION_UNAVAILABLE: &str =
    "The AI service is temporarily unavailable, please create the activity manually.";

/// One system + user message exchange.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(system: &str, user: String, max_tokens: u32, temperature: f32) -> Self {
        Self {
            system: system.to_string(),
            user,
            max_tokens,
            temperature,
        }
    }
}

/// Chat completion backend.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Sends the request and returns the assistant message text.
    async fn complete(&self, request: ChatRequest) -> Result<String, AiError>;
}

/// Result of an AI call that has a structured fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome {
    /// The model answered; the value may itself be a parse fallback.
    Completed(Value),
    /// The call failed; the value carries an `error` field.
    Unavailable(Value),
}

#[derive(Clone)]
pub struct AiService {
    client: Arc<dyn ChatCompletion>,
}

impl AiService {
    pub fn new(client: Arc<dyn ChatCompletion>) -> Self {
        Self { client }
    }

    /// Generates activity content for the requested type.
    ///
    /// # Arguments
    /// - `request` - Activity type, course content and optional extra instructions
    ///
    /// # Returns
    /// - `AiOutcome::Completed` - Parsed activity JSON, or the raw text wrapped with `parse_error`
    /// - `AiOutcome::Unavailable` - `{error, title, description}` when the API call failed
    pub async fn generate_activity(&self, request: &GenerationRequest) -> AiOutcome {
        match self.client.complete(prompt::activity_generation(request)).await {
            Ok(raw) => AiOutcome::Completed(extract::parse_generated_activity(
                &raw,
                &request.activity_type,
            )),
            Err(err) => {
                tracing::warn!("Activity generation failed: {}", err);
                AiOutcome::Unavailable(json!({
                    "error": format!("AI generation failed: {}", err),
                    "title": format!("AI generated {} activity", request.activity_type),
                    "description": GENERATION_UNAVAILABLE,
                }))
            }
        }
    }

    /// Summarises a set of answers.
    ///
    /// # Returns
    /// - `AiOutcome::Completed` - Analysis JSON, or `{summary, raw_analysis}` for free text
    /// - `AiOutcome::Unavailable` - `{error, summary}` when the API call failed
    pub async fn analyze_responses(&self, activity_type: &str, answers: &[String]) -> AiOutcome {
        match self
            .client
            .complete(prompt::response_analysis(activity_type, answers))
            .await
        {
            Ok(raw) => AiOutcome::Completed(extract::parse_analysis(&raw)),
            Err(err) => {
                tracing::warn!("Response analysis failed: {}", err);
                AiOutcome::Unavailable(json!({
                    "error": format!("AI analysis failed: {}", err),
                    "summary": "The AI analysis service is temporarily unavailable",
                }))
            }
        }
    }

    /// Writes feedback for one answer, or an apology when the API is unavailable.
    pub async fn generate_feedback(
        &self,
        student_response: &str,
        correct_answer: &str,
        activity_type: &str,
    ) -> String {
        self.complete_text(
            prompt::feedback(student_response, correct_answer, activity_type),
            "AI feedback generation failed",
        )
        .await
    }

    /// Groups answers by similarity.
    ///
    /// Asks the model first and falls back to lexical grouping when the call fails or the
    /// reply has no usable `similarity_groups`. Fewer than two answers skip the model.
    pub async fn group_responses(&self, inputs: &[GroupInput]) -> Vec<ResponseGroupDto> {
        if inputs.len() < 2 {
            return grouping::group_lexically(inputs);
        }

        let answers: Vec<String> = inputs.iter().map(|i| i.text.clone()).collect();
        if let AiOutcome::Completed(analysis) = self.analyze_responses("grouping", &answers).await {
            if let Some(groups) = grouping::groups_from_analysis(&analysis, inputs) {
                return groups;
            }
        }

        grouping::group_lexically(inputs)
    }

    pub async fn answer_course_question(&self, question: &str, context: &CourseContext) -> String {
        self.complete_text(
            prompt::course_question(question, context),
            "Sorry, the AI service is temporarily unavailable",
        )
        .await
    }

    /// Answers a question outside any course, given the caller's `(name, code)` courses.
    pub async fn answer_general_question(
        &self,
        question: &str,
        courses: &[(String, String)],
    ) -> String {
        self.complete_text(
            prompt::general_question(question, courses),
            "Sorry, the AI service is temporarily unavailable",
        )
        .await
    }

    async fn complete_text(&self, request: ChatRequest, apology: &str) -> String {
        match self.client.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("{}: {}", apology, err);
                format!("{}: {}", apology, err)
            }
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Mutex;

    use super::*;

    /// Replays canned replies in order; an exhausted queue fails like an unconfigured API.
    pub struct ScriptedChat {
        replies: Mutex<Vec<Result<String, AiError>>>,
        pub prompts: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedChat {
        pub fn new(mut replies: Vec<Result<String, AiError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn service(replies: Vec<Result<String, AiError>>) -> AiService {
            AiService::new(Arc::new(Self::new(replies)))
        }

        pub fn unavailable() -> AiService {
            Self::service(Vec::new())
        }
    }

    #[async_trait]
    impl ChatCompletion for ScriptedChat {
        async fn complete(&self, request: ChatRequest) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(AiError::NotConfigured))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{test_support::ScriptedChat, *};

    fn inputs(texts: &[&str]) -> Vec<GroupInput> {
        texts
            .iter()
            .enumerate()
            .map(|(idx, text)| GroupInput {
                response_id: idx as i32 + 1,
                text: text.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn generation_reports_unavailable_api() {
        let outcome = ScriptedChat::unavailable()
            .generate_activity(&GenerationRequest {
                activity_type: "poll".to_string(),
                ..Default::default()
            })
            .await;

        let AiOutcome::Unavailable(value) = outcome else {
            panic!("expected fallback");
        };
        assert!(value["error"].as_str().unwrap().starts_with("AI generation failed"));
        assert_eq!(value["title"], "AI generated poll activity");
    }

    #[tokio::test]
    async fn generation_parses_fenced_reply() {
        let reply = "```json\n{\"title\":\"T\"}\n```";
        let service = ScriptedChat::service(vec![Ok(reply.to_string())]);

        let outcome = service
            .generate_activity(&GenerationRequest {
                activity_type: "quiz".to_string(),
                ..Default::default()
            })
            .await;

        assert_eq!(outcome, AiOutcome::Completed(json!({ "title": "T" })));
    }

    #[tokio::test]
    async fn grouping_falls_back_to_lexical() {
        let groups = ScriptedChat::unavailable()
            .group_responses(&inputs(&["red apple", "red apple pie", "blue sky"]))
            .await;

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].response_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn grouping_uses_model_groups() {
        let reply = json!({
            "similarity_groups": [
                { "group_id": 1, "students": ["Student 1", "Student 3"] },
                { "group_id": 2, "students": ["Student 2"] },
            ]
        })
        .to_string();
        let service = ScriptedChat::service(vec![Ok(reply)]);

        let groups = service
            .group_responses(&inputs(&["x", "y", "z"]))
            .await;

        assert_eq!(groups[0].response_ids, vec![1, 3]);
        assert_eq!(groups[1].response_ids, vec![2]);
    }

    #[tokio::test]
    async fn feedback_apologises_when_unavailable() {
        let text = ScriptedChat::unavailable()
            .generate_feedback("answer", "", "quiz")
            .await;

        assert!(text.starts_with("AI feedback generation failed"));
    }
}
