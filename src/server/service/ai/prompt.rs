//! Prompt templates for every AI feature.

use std::fmt::Write;

use crate::server::service::ai::ChatRequest;

/// Longest document excerpt placed into a course question context, in characters.
pub const MAX_DOCUMENT_CONTEXT_CHARS: usize = 2000;

const ACTIVITY_SYSTEM: &str = "You are an educational technology expert who designs interactive \
learning activities. Reply with pure JSON only, without any other text or markdown.";
const ANALYSIS_SYSTEM: &str =
    "You are an educational data analyst who specialises in student learning data.";
const FEEDBACK_SYSTEM: &str = "You are a patient teacher who gives constructive feedback.";
const COURSE_QA_SYSTEM: &str = "You are a course assistant that helps students and teachers with \
questions about a course. Answer accurately from the course materials and activities provided.";
const GENERAL_QA_SYSTEM: &str = "You are a general assistant for a smart classroom platform. For \
questions about a specific course you point the user to that course's AI assistant.";

/// Inputs for generating an activity.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub activity_type: String,
    pub course_content: String,
    pub web_resources: String,
    pub additional_prompt: String,
    pub time_limit: Option<i32>,
}

/// Course information given to the course assistant.
#[derive(Debug, Clone, Default)]
pub struct CourseContext {
    pub course_name: String,
    pub course_code: String,
    pub description: Option<String>,
    pub documents: Vec<DocumentContext>,
    pub activities: Vec<ActivityContext>,
}

#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ActivityContext {
    pub title: String,
    pub description: Option<String>,
    pub config: Option<serde_json::Value>,
}

/// JSON layout the model is asked to fill for each activity type.
fn activity_schema(activity_type: &str) -> (&'static str, &'static str) {
    match activity_type {
        "poll" => (
            "a poll activity",
            r#"{
  "title": "Activity title",
  "description": "Activity description",
  "question": "Poll question",
  "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
  "correct_answer": "Correct answer, if any",
  "explanation": "Explanation"
}"#,
        ),
        "word_cloud" => (
            "a word cloud activity",
            r#"{
  "title": "Word cloud title",
  "description": "Activity description",
  "prompt": "Ask students for keywords related to the topic",
  "max_words": 10,
  "min_word_length": 2
}"#,
        ),
        "short_answer" => (
            "a short answer activity",
            r#"{
  "title": "Short answer title",
  "description": "Activity description",
  "questions": [
    {
      "question": "Question text",
      "type": "short_answer",
      "max_length": 500,
      "sample_answer": "Reference answer"
    }
  ],
  "time_limit": 600
}"#,
        ),
        "mini_game" => (
            "a mini game activity",
            r#"{
  "title": "Game title",
  "description": "Game description",
  "game_type": "matching",
  "rules": "Game rules",
  "content": {
    "items": ["Item 1", "Item 2", "Item 3"],
    "matches": ["Match 1", "Match 2", "Match 3"]
  }
}"#,
        ),
        _ => (
            "a quiz activity",
            r#"{
  "title": "Quiz title",
  "description": "Quiz description",
  "questions": [
    {
      "question": "Question text",
      "type": "multiple_choice",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correct_answer": 0,
      "explanation": "Explanation"
    }
  ],
  "time_limit": 300
}"#,
        ),
    }
}

/// Builds the activity generation prompt. Unknown types use the quiz layout.
pub fn activity_generation(request: &GenerationRequest) -> ChatRequest {
    let (kind, schema) = activity_schema(&request.activity_type);
    let time_limit = request
        .time_limit
        .map(|minutes| format!("\nTime Limit: {} minutes", minutes))
        .unwrap_or_default();

    let user = format!(
        "Based on the following course content, generate {kind}.\n\
         Course content: {content}\n\
         Web resources: {web}\n\
         Additional requirements: {extra}{time_limit}\n\n\
         Return JSON with the following structure:\n{schema}",
        content = request.course_content,
        web = request.web_resources,
        extra = request.additional_prompt,
    );

    ChatRequest::new(ACTIVITY_SYSTEM, user, 1000, 0.7)
}

/// Builds the response analysis prompt. Answers are labelled `Student 1`, `Student 2`, ...
pub fn response_analysis(activity_type: &str, answers: &[String]) -> ChatRequest {
    let answers_text = answers
        .iter()
        .enumerate()
        .map(|(idx, answer)| format!("Student {}: {}", idx + 1, answer))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Analyse the following student answers. Activity type: {activity_type}\n\n\
         Student answers:\n{answers_text}\n\n\
         Provide the analysis as JSON:\n\
         {{\n  \"summary\": \"Summary of the answers\",\n  \
         \"common_themes\": [\"Theme 1\", \"Theme 2\"],\n  \
         \"similarity_groups\": [\n    \
         {{\"group_id\": 1, \"students\": [\"Student 1\", \"Student 2\"], \
         \"similarity_reason\": \"Why they are similar\"}}\n  ],\n  \
         \"insights\": [\"Insight 1\"],\n  \
         \"recommendations\": [\"Recommendation 1\"]\n}}"
    );

    ChatRequest::new(ANALYSIS_SYSTEM, user, 800, 0.5)
}

pub fn feedback(student_response: &str, correct_answer: &str, activity_type: &str) -> ChatRequest {
    let user = format!(
        "Write constructive feedback for this student answer.\n\n\
         Student answer: {student_response}\n\
         Correct answer: {correct_answer}\n\
         Activity type: {activity_type}\n\n\
         Include:\n1. Positive comments\n2. Suggestions for improvement\n3. Encouragement\n\n\
         Keep the tone friendly and constructive."
    );

    ChatRequest::new(FEEDBACK_SYSTEM, user, 300, 0.7)
}

/// Renders the course context block used by the course assistant.
pub fn render_course_context(context: &CourseContext) -> String {
    let mut text = format!(
        "Course information:\n- Course name: {}\n- Course code: {}\n- Description: {}\n",
        context.course_name,
        context.course_code,
        context.description.as_deref().unwrap_or("No description"),
    );

    if !context.documents.is_empty() {
        text.push_str("\nCourse materials:\n");
        for document in &context.documents {
            let _ = write!(text, "- {}", document.title);
            if let Some(description) = &document.description {
                let _ = write!(text, ": {}", description);
            }
            if let Some(content) = &document.content {
                let excerpt: String = content.chars().take(MAX_DOCUMENT_CONTEXT_CHARS).collect();
                let _ = write!(text, "\n  Content excerpt: {}\n", excerpt);
            }
            text.push('\n');
        }
    }

    if !context.activities.is_empty() {
        text.push_str("\nCourse activities:\n");
        for activity in &context.activities {
            let _ = write!(text, "- {}", activity.title);
            if let Some(description) = &activity.description {
                let _ = write!(text, ": {}", description);
            }
            if let Some(config) = activity.config.as_ref().and_then(|c| c.as_object()) {
                if let Some(question) = config.get("question").and_then(|q| q.as_str()) {
                    let _ = write!(text, "\n  Question: {}", question);
                }
                if let Some(options) = config.get("options").and_then(|o| o.as_array()) {
                    let options: Vec<&str> = options.iter().filter_map(|o| o.as_str()).collect();
                    let _ = write!(text, "\n  Options: {}", options.join(", "));
                }
            }
            text.push('\n');
        }
    }

    text
}

pub fn course_question(question: &str, context: &CourseContext) -> ChatRequest {
    let user = format!(
        "Course context:\n{}\n\
         User question: {question}\n\n\
         Answer using the course information above:\n\
         1. Be accurate, clear and helpful\n\
         2. Cite the relevant course material when the question concerns it\n\
         3. Describe the relevant activity when the question concerns one\n\
         4. If the information is insufficient, say so instead of inventing facts\n\
         5. Use the friendly tone of a patient teacher or teaching assistant",
        render_course_context(context),
    );

    ChatRequest::new(COURSE_QA_SYSTEM, user, 1500, 0.7)
}

/// Builds the general assistant prompt from the caller's `(course_name, course_code)` list.
pub fn general_question(question: &str, courses: &[(String, String)]) -> ChatRequest {
    let mut courses_info = String::new();
    if !courses.is_empty() {
        courses_info.push_str("Courses available to the user:\n");
        for (name, code) in courses {
            let _ = writeln!(courses_info, "- {} ({})", name, code);
        }
    }

    let user = format!(
        "{courses_info}\nUser question: {question}\n\n\
         Follow these rules:\n\
         1. Answer general questions (platform usage, features, study advice) directly\n\
         2. For questions about a specific course's content, materials or activities, point the \
         user to that course's AI assistant, available from the course detail page\n\
         3. Keep a friendly and patient tone"
    );

    ChatRequest::new(GENERAL_QA_SYSTEM, user, 1500, 0.7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_type_uses_quiz_layout() {
        let request = activity_generation(&GenerationRequest {
            activity_type: "debate".to_string(),
            course_content: "Ownership".to_string(),
            ..Default::default()
        });

        assert!(request.user.contains("a quiz activity"));
        assert!(request.user.contains("multiple_choice"));
    }

    #[test]
    fn includes_time_limit_when_given() {
        let request = activity_generation(&GenerationRequest {
            activity_type: "poll".to_string(),
            time_limit: Some(5),
            ..Default::default()
        });

        assert!(request.user.contains("Time Limit: 5 minutes"));
    }

    #[test]
    fn labels_students_in_order() {
        let request = response_analysis("poll", &["yes".to_string(), "no".to_string()]);

        assert!(request.user.contains("Student 1: yes\nStudent 2: no"));
    }

    #[test]
    fn truncates_long_documents() {
        let context = CourseContext {
            course_name: "Databases".to_string(),
            course_code: "COMP3311".to_string(),
            documents: vec![DocumentContext {
                title: "notes".to_string(),
                description: None,
                content: Some("x".repeat(MAX_DOCUMENT_CONTEXT_CHARS + 500)),
            }],
            ..Default::default()
        };

        let text = render_course_context(&context);

        assert!(text.contains(&"x".repeat(MAX_DOCUMENT_CONTEXT_CHARS)));
        assert!(!text.contains(&"x".repeat(MAX_DOCUMENT_CONTEXT_CHARS + 1)));
        assert!(text.contains("Description: No description"));
    }

    #[test]
    fn renders_activity_question_and_options() {
        let context = CourseContext {
            activities: vec![ActivityContext {
                title: "Warm-up".to_string(),
                description: None,
                config: Some(json!({
                    "question": "Favourite language?",
                    "options": ["Rust", "Go"],
                })),
            }],
            ..Default::default()
        };

        let text = render_course_context(&context);

        assert!(text.contains("Question: Favourite language?"));
        assert!(text.contains("Options: Rust, Go"));
    }
}
