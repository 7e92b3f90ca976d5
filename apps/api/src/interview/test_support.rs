//! Fake fetchers and fixtures shared by the interview tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::interview::fetcher::{question_id, BatchFetcher, FetchError};
use crate::interview::models::{Difficulty, GeneratedQuestion, InterviewQuestion, QaPair, RoleType};
use crate::interview::session::{SessionController, SessionError, SessionPhase};
use crate::llm_client::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A loop was already in flight; nothing was started.
    AlreadyRunning,
    /// The loop ran and stopped in the given phase.
    Finished(SessionPhase),
}

/// Starts (or resumes) and runs the loop to its end on the current task.
pub async fn run(
    session: &SessionController,
    role: Option<RoleType>,
) -> Result<StartOutcome, SessionError> {
    match session.begin(role)? {
        Some(ticket) => Ok(StartOutcome::Finished(session.drive(ticket).await)),
        None => Ok(StartOutcome::AlreadyRunning),
    }
}

pub fn question_with(category: &str, topic: &str) -> InterviewQuestion {
    InterviewQuestion::new(
        question_id(0, 0),
        GeneratedQuestion {
            category: category.to_string(),
            topic: topic.to_string(),
            difficulty: Difficulty::Medium,
            en: QaPair {
                question: format!("A question about {topic}?"),
                answer: "A short answer.".to_string(),
            },
            vi: QaPair {
                question: format!("Một câu hỏi về {topic}?"),
                answer: "Một câu trả lời ngắn.".to_string(),
            },
        },
    )
}

pub fn sample_batch(batch_index: usize, count: usize) -> Vec<InterviewQuestion> {
    (0..count)
        .map(|position| {
            let mut generated = GeneratedQuestion {
                category: "Technical".to_string(),
                topic: "Graph Neural Networks".to_string(),
                difficulty: Difficulty::Easy,
                en: QaPair {
                    question: format!("Question {position} of batch {batch_index}"),
                    answer: "Answer".to_string(),
                },
                vi: QaPair {
                    question: format!("Câu hỏi {position} của lô {batch_index}"),
                    answer: "Trả lời".to_string(),
                },
            };
            if position % 2 == 1 {
                generated.category = "Behavioral".to_string();
                generated.topic = "Leadership".to_string();
            }
            InterviewQuestion::new(question_id(batch_index, position), generated)
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub enum ScriptStep {
    Full,
    Partial(usize),
    Transient,
    Auth,
}

/// Plays back a script of outcomes, then returns full batches forever.
/// Records every requested batch index.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<ScriptStep>>,
    requested: Mutex<Vec<usize>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn always_full() -> Self {
        Self::new(Vec::new())
    }

    pub fn requested(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchFetcher for ScriptedFetcher {
    async fn fetch_batch(
        &self,
        _role: RoleType,
        batch_size: usize,
        batch_index: usize,
    ) -> Result<Vec<InterviewQuestion>, FetchError> {
        self.requested.lock().unwrap().push(batch_index);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ScriptStep::Full);
        match step {
            ScriptStep::Full => Ok(sample_batch(batch_index, batch_size)),
            ScriptStep::Partial(count) => Ok(sample_batch(batch_index, count)),
            ScriptStep::Transient => Err(FetchError::Transient(LlmError::Api {
                status: 503,
                message: "The model is overloaded".to_string(),
            })),
            ScriptStep::Auth => Err(FetchError::Authentication(
                "API error (status 400): API key not valid".to_string(),
            )),
        }
    }
}

/// Blocks inside `fetch_batch` until released, to simulate a slow remote call.
#[derive(Default)]
pub struct GatedFetcher {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl BatchFetcher for GatedFetcher {
    async fn fetch_batch(
        &self,
        _role: RoleType,
        batch_size: usize,
        batch_index: usize,
    ) -> Result<Vec<InterviewQuestion>, FetchError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(sample_batch(batch_index, batch_size))
    }
}
