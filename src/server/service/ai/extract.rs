//! Best-effort JSON recovery from model output.

use serde_json::{json, Value};

/// Strips a leading markdown code fence and every fence marker from the reply.
fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.starts_with("```json") {
        trimmed.replace("```json", "").replace("```", "").trim().to_string()
    } else if trimmed.starts_with("```") {
        trimmed.replace("```", "").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a model reply as JSON.
///
/// Tries the fence-stripped text first, then the span from the first `{` to the last `}`.
///
/// # Returns
/// - `Ok(Value)` - Parsed JSON
/// - `Err((String, String))` - Parse error of the first attempt and the cleaned text
pub fn extract_json(raw: &str) -> Result<Value, (String, String)> {
    let content = strip_fences(raw);

    let first_error = match serde_json::from_str::<Value>(&content) {
        Ok(value) => return Ok(value),
        Err(err) => err.to_string(),
    };

    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&content[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err((first_error, content))
}

/// Interprets a generated activity, wrapping unparseable text in a structured object.
pub fn parse_generated_activity(raw: &str, activity_type: &str) -> Value {
    match extract_json(raw) {
        Ok(value) => value,
        Err((parse_error, content)) => json!({
            "title": format!("AI generated {} activity", activity_type),
            "description": content,
            "raw_content": content,
            "parse_error": parse_error,
        }),
    }
}

/// Interprets an analysis reply; free text becomes the summary.
pub fn parse_analysis(raw: &str) -> Value {
    match extract_json(raw) {
        Ok(value) => value,
        Err((_, content)) => json!({
            "summary": content,
            "raw_analysis": content,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let value = parse_generated_activity(r#"{"title": "Quiz"}"#, "quiz");
        assert_eq!(value["title"], "Quiz");
    }

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"title\": \"Poll\", \"options\": [\"A\"]}\n```";
        let value = parse_generated_activity(raw, "poll");
        assert_eq!(value["title"], "Poll");
        assert_eq!(value["options"][0], "A");
    }

    #[test]
    fn strips_bare_fence() {
        let raw = "```\n{\"title\": \"Cloud\"}\n```";
        assert_eq!(parse_generated_activity(raw, "word_cloud")["title"], "Cloud");
    }

    #[test]
    fn extracts_outer_braces_from_prose() {
        let raw = "Here you go: {\"title\": \"Game\", \"content\": {\"items\": []}} Enjoy!";
        let value = parse_generated_activity(raw, "mini_game");
        assert_eq!(value["title"], "Game");
        assert!(value["content"]["items"].is_array());
    }

    #[test]
    fn wraps_unparseable_text() {
        let value = parse_generated_activity("Sorry, I cannot help.", "quiz");
        assert_eq!(value["title"], "AI generated quiz activity");
        assert_eq!(value["description"], "Sorry, I cannot help.");
        assert_eq!(value["raw_content"], "Sorry, I cannot help.");
        assert!(value["parse_error"].is_string());
    }

    #[test]
    fn analysis_falls_back_to_summary() {
        let value = parse_analysis("Most students agree.");
        assert_eq!(value["summary"], "Most students agree.");
        assert_eq!(value["raw_analysis"], "Most students agree.");
    }
}
