// Prompt and response-schema definitions for question generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::{json, Value};

use crate::interview::models::RoleType;
use crate::llm_client::prompts::JSON_ARRAY_ONLY;

/// Batch prompt template.
/// Replace: {batch_size}, {role}, {batch_number}, {json_instruction}
pub const BATCH_PROMPT_TEMPLATE: &str = r#"Generate {batch_size} interview questions for a {role} candidate.
Batch #{batch_number}.

**Topics:**
- Mix of Technical (Quantum AI, GNN, 6G, SAGINs) and Behavioral.
- If Technical: focus on integration of AI in Satellite networks or Quantum security.

**Requirements:**
- English (en) and Vietnamese (vi) translations.
- Answers must be **concise** but accurate (approx 2-3 sentences max).
- {json_instruction}"#;

/// Builds the prompt for one batch. `batch_index` is zero-based; the prompt
/// shows it one-based.
pub fn build_batch_prompt(role: RoleType, batch_size: usize, batch_index: usize) -> String {
    BATCH_PROMPT_TEMPLATE
        .replace("{batch_size}", &batch_size.to_string())
        .replace("{role}", role.label())
        .replace("{batch_number}", &(batch_index + 1).to_string())
        .replace("{json_instruction}", JSON_ARRAY_ONLY)
}

fn qa_pair_schema(question_description: Option<&str>, answer_description: &str) -> Value {
    let mut question = json!({ "type": "STRING" });
    if let Some(description) = question_description {
        question["description"] = json!(description);
    }
    json!({
        "type": "OBJECT",
        "properties": {
            "question": question,
            "answer": { "type": "STRING", "description": answer_description },
        },
        "required": ["question", "answer"],
    })
}

/// The structured-output schema sent with every batch request: an array of
/// question objects with bilingual QA pairs.
pub fn question_batch_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "category": {
                    "type": "STRING",
                    "description": "Category of the question (e.g., Technical, Behavioral, Research Vision)",
                },
                "topic": {
                    "type": "STRING",
                    "description": "Specific topic (e.g., GNN, 6G, Leadership, Conflict Resolution)",
                },
                "difficulty": { "type": "STRING", "enum": ["Easy", "Medium", "Hard"] },
                "en": qa_pair_schema(None, "Concise yet comprehensive answer key"),
                "vi": qa_pair_schema(
                    Some("Vietnamese translation of the question"),
                    "Vietnamese translation of the answer",
                ),
            },
            "required": ["category", "topic", "difficulty", "en", "vi"],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_shows_one_based_batch_number() {
        let prompt = build_batch_prompt(RoleType::Industry, 20, 2);
        assert!(prompt.starts_with("Generate 20 interview questions for a R&D Engineer (Industry) candidate."));
        assert!(prompt.contains("Batch #3."));
        assert!(prompt.contains("pure JSON array"));
        assert!(!prompt.contains('{'), "every placeholder must be filled");
    }

    #[test]
    fn test_schema_requires_every_field() {
        let schema = question_batch_schema();
        assert_eq!(schema["type"], "ARRAY");
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);
        assert_eq!(
            schema["items"]["properties"]["difficulty"]["enum"],
            json!(["Easy", "Medium", "Hard"])
        );
        assert_eq!(
            schema["items"]["properties"]["vi"]["required"],
            json!(["question", "answer"])
        );
        assert!(schema["items"]["properties"]["en"]["properties"]["question"]
            .get("description")
            .is_none());
    }
}
