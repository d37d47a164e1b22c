//! Grouping of similar answers.

use std::collections::HashSet;

use serde_json::Value;

use crate::model::ai::ResponseGroupDto;

/// Minimum word-set Jaccard similarity for two answers to share a group (exclusive).
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// An answer to group: response ID and its text.
#[derive(Debug, Clone)]
pub struct GroupInput {
    pub response_id: i32,
    pub text: String,
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of the lowercase whitespace-separated word sets.
///
/// Two empty answers have similarity 0.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a = word_set(a);
    let b = word_set(b);

    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }

    a.intersection(&b).count() as f64 / union as f64
}

fn group_from(group_id: u32, members: &[&GroupInput]) -> ResponseGroupDto {
    ResponseGroupDto {
        group_id,
        response_ids: members.iter().map(|m| m.response_id).collect(),
        representative: members.first().map(|m| m.text.clone()).unwrap_or_default(),
        size: members.len(),
    }
}

/// Greedy lexical grouping in submission order.
///
/// Each ungrouped answer opens a group and pulls in every later ungrouped answer whose
/// similarity to it exceeds `SIMILARITY_THRESHOLD`. Fewer than two answers form one group.
pub fn group_lexically(inputs: &[GroupInput]) -> Vec<ResponseGroupDto> {
    if inputs.len() < 2 {
        let members: Vec<&GroupInput> = inputs.iter().collect();
        return vec![group_from(1, &members)];
    }

    let mut used = vec![false; inputs.len()];
    let mut groups = Vec::new();

    for i in 0..inputs.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut members = vec![&inputs[i]];

        for j in (i + 1)..inputs.len() {
            if !used[j] && jaccard(&inputs[i].text, &inputs[j].text) > SIMILARITY_THRESHOLD {
                used[j] = true;
                members.push(&inputs[j]);
            }
        }

        groups.push(group_from(groups.len() as u32 + 1, &members));
    }

    groups
}

/// Reads `similarity_groups` from an AI analysis.
///
/// Students are labelled `Student N` (1-based, submission order) in the prompt; labels that
/// do not resolve to an answer are ignored. Returns `None` when the analysis has no usable
/// groups so the caller can fall back to lexical grouping.
pub fn groups_from_analysis(
    analysis: &Value,
    inputs: &[GroupInput],
) -> Option<Vec<ResponseGroupDto>> {
    let raw_groups = analysis.get("similarity_groups")?.as_array()?;

    let mut groups = Vec::new();
    for raw in raw_groups {
        let Some(students) = raw.get("students").and_then(Value::as_array) else {
            continue;
        };

        let mut seen = HashSet::new();
        let members: Vec<&GroupInput> = students
            .iter()
            .filter_map(label_index)
            .filter(|idx| seen.insert(*idx))
            .filter_map(|idx| inputs.get(idx))
            .collect();

        if !members.is_empty() {
            groups.push(group_from(groups.len() as u32 + 1, &members));
        }
    }

    (!groups.is_empty()).then_some(groups)
}

/// Zero-based answer index for a `Student N` label or a bare number.
fn label_index(label: &Value) -> Option<usize> {
    let number = match label {
        Value::Number(n) => n.as_u64()? as usize,
        Value::String(s) => {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<usize>().ok()?
        }
        _ => return None,
    };

    number.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs(texts: &[&str]) -> Vec<GroupInput> {
        texts
            .iter()
            .enumerate()
            .map(|(idx, text)| GroupInput {
                response_id: idx as i32 + 10,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn jaccard_ignores_case() {
        assert_eq!(jaccard("Rust is fast", "rust IS fast"), 1.0);
        assert_eq!(jaccard("", ""), 0.0);
    }

    #[test]
    fn groups_similar_answers_greedily() {
        let groups = group_lexically(&inputs(&[
            "memory safety without garbage collection",
            "pizza",
            "memory safety and no garbage collection",
            "Pizza",
        ]));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].response_ids, vec![10, 12]);
        assert_eq!(groups[1].response_ids, vec![11, 13]);
        assert_eq!(groups[1].representative, "pizza");
        assert_eq!(groups[0].size, 2);
    }

    #[test]
    fn threshold_is_exclusive() {
        // 3 shared words out of 10 distinct gives exactly 0.3
        let groups = group_lexically(&inputs(&[
            "a b c d e f g",
            "a b c h i j",
        ]));

        assert_eq!(jaccard("a b c d e f g", "a b c h i j"), 0.3);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn single_answer_forms_one_group() {
        let groups = group_lexically(&inputs(&["only"]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].response_ids, vec![10]);
    }

    #[test]
    fn reads_groups_from_analysis() {
        let analysis = json!({
            "similarity_groups": [
                { "group_id": 1, "students": ["Student 1", "Student 3", "Student 9"] },
                { "group_id": 2, "students": ["Student 2"] }
            ]
        });

        let groups = groups_from_analysis(&analysis, &inputs(&["a", "b", "c"])).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].response_ids, vec![10, 12]);
        assert_eq!(groups[1].response_ids, vec![11]);
    }

    #[test]
    fn missing_groups_yield_none() {
        let analysis = json!({ "summary": "no groups" });

        assert!(groups_from_analysis(&analysis, &inputs(&["a", "b"])).is_none());
    }
}
