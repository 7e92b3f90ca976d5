use serde::Serialize;

use crate::interview::models::InterviewQuestion;

/// Sentinel filter value that keeps every question.
pub const FILTER_ALL: &str = "All";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopicFilter {
    pub value: &'static str,
    pub label: &'static str,
}

/// Filters offered to the rendering layer. Any other substring works too.
pub const PRESET_FILTERS: [TopicFilter; 5] = [
    TopicFilter {
        value: FILTER_ALL,
        label: "All Topics",
    },
    TopicFilter {
        value: "Technical",
        label: "Technical (General)",
    },
    TopicFilter {
        value: "Quantum",
        label: "Quantum AI / QML",
    },
    TopicFilter {
        value: "Satellite",
        label: "6G / NTN / SAGINs",
    },
    TopicFilter {
        value: "Behavioral",
        label: "Behavioral / Communication",
    },
];

/// Case-insensitive substring match against category or topic.
pub fn matches_topic(question: &InterviewQuestion, filter: &str) -> bool {
    if filter == FILTER_ALL {
        return true;
    }
    let needle = filter.to_lowercase();
    question.category().to_lowercase().contains(&needle)
        || question.topic().to_lowercase().contains(&needle)
}

pub fn filter_questions<'a>(
    questions: &'a [InterviewQuestion],
    filter: &str,
) -> Vec<&'a InterviewQuestion> {
    questions
        .iter()
        .filter(|q| matches_topic(q, filter))
        .collect()
}
