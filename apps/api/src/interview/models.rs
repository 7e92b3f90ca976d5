use serde::{Deserialize, Serialize};

/// The target role a session generates questions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    #[default]
    Postdoc,
    Teaching,
    Industry,
}

impl RoleType {
    pub const ALL: [RoleType; 3] = [RoleType::Postdoc, RoleType::Teaching, RoleType::Industry];

    /// Human-readable label, also used verbatim in the generation prompt.
    pub fn label(self) -> &'static str {
        match self {
            RoleType::Postdoc => "Postdoc Researcher",
            RoleType::Teaching => "University Lecturer/Professor",
            RoleType::Industry => "R&D Engineer (Industry)",
        }
    }
}

impl std::fmt::Display for RoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One question with its answer key, in a single language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// A question record exactly as the model returns it, before an id is assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedQuestion {
    pub category: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub en: QaPair,
    pub vi: QaPair,
}

/// A bilingual interview question. Immutable once created: fields are
/// private and only readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewQuestion {
    id: String,
    category: String,
    topic: String,
    difficulty: Difficulty,
    en: QaPair,
    vi: QaPair,
}

impl InterviewQuestion {
    pub fn new(id: String, generated: GeneratedQuestion) -> Self {
        Self {
            id,
            category: generated.category,
            topic: generated.topic,
            difficulty: generated.difficulty,
            en: generated.en,
            vi: generated.vi,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_question_parses_model_output() {
        let raw = r#"{
            "category": "Technical",
            "topic": "Graph Neural Networks",
            "difficulty": "Hard",
            "en": {"question": "What is over-smoothing?", "answer": "Node features converge."},
            "vi": {"question": "Over-smoothing là gì?", "answer": "Đặc trưng nút hội tụ."}
        }"#;
        let generated: GeneratedQuestion = serde_json::from_str(raw).unwrap();
        assert_eq!(generated.difficulty, Difficulty::Hard);

        let question = InterviewQuestion::new("q-1".to_string(), generated);
        assert_eq!(question.id(), "q-1");
        assert_eq!(question.topic(), "Graph Neural Networks");
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["vi"]["question"], "Over-smoothing là gì?");
        assert_eq!(value["difficulty"], "Hard");
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let raw = r#"{
            "category": "Behavioral",
            "topic": "Leadership",
            "difficulty": "Extreme",
            "en": {"question": "q", "answer": "a"},
            "vi": {"question": "q", "answer": "a"}
        }"#;
        assert!(serde_json::from_str::<GeneratedQuestion>(raw).is_err());
    }

    #[test]
    fn test_role_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(RoleType::Industry).unwrap(),
            serde_json::json!("industry")
        );
        assert_eq!(RoleType::default(), RoleType::Postdoc);
        assert_eq!(RoleType::Teaching.to_string(), "University Lecturer/Professor");
    }
}
