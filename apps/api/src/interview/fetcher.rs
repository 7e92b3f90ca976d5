//! Batch Fetcher: one remote call that turns (role, size, batch index) into
//! freshly identified question records.
//!
//! Failure policy: authentication problems are fatal; every other failure is
//! propagated as `FetchError::Transient` so the session can stall and resume.
//! An empty response is not an error and yields an empty batch.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::ApiKeySource;
use crate::interview::models::{GeneratedQuestion, InterviewQuestion, RoleType};
use crate::interview::prompts::{build_batch_prompt, question_batch_schema};
use crate::llm_client::prompts::GENERATION_TEMPERATURE;
use crate::llm_client::{strip_json_fences, LlmClient, LlmError, StructuredRequest};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("AUTHENTICATION_FAILED: {0}")]
    Authentication(String),

    #[error("AUTHENTICATION_FAILED: no API key configured (checked {0})")]
    MissingCredential(String),

    #[error("batch request failed: {0}")]
    Transient(#[from] LlmError),
}

impl FetchError {
    /// Fatal errors cannot be fixed by resuming; they need a credential fix.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FetchError::Authentication(_) | FetchError::MissingCredential(_)
        )
    }
}

/// The seam between the session loop and the remote generator.
#[async_trait]
pub trait BatchFetcher: Send + Sync {
    /// Returns at most `batch_size` questions, each with a fresh unique id.
    async fn fetch_batch(
        &self,
        role: RoleType,
        batch_size: usize,
        batch_index: usize,
    ) -> Result<Vec<InterviewQuestion>, FetchError>;
}

/// Builds `batch-{index}-q-{position}-{millis}-{uuid}`. Index and position
/// locate the record, the timestamp and random suffix keep it unique.
pub fn question_id(batch_index: usize, position: usize) -> String {
    format!(
        "batch-{batch_index}-q-{position}-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

/// Parses a model response into identified questions, keeping at most
/// `batch_size` of them.
pub fn parse_batch(
    raw: &str,
    batch_size: usize,
    batch_index: usize,
) -> Result<Vec<InterviewQuestion>, LlmError> {
    let generated: Vec<GeneratedQuestion> = serde_json::from_str(strip_json_fences(raw))?;

    if generated.len() > batch_size {
        warn!(
            "Batch {} returned {} questions (requested {}), truncating",
            batch_index,
            generated.len(),
            batch_size
        );
    }

    Ok(generated
        .into_iter()
        .take(batch_size)
        .enumerate()
        .map(|(position, q)| InterviewQuestion::new(question_id(batch_index, position), q))
        .collect())
}

/// Production fetcher backed by Gemini structured output.
pub struct GeminiBatchFetcher {
    llm: LlmClient,
    keys: ApiKeySource,
    schema: Value,
}

impl GeminiBatchFetcher {
    pub fn new(llm: LlmClient, keys: ApiKeySource) -> Self {
        Self {
            llm,
            keys,
            schema: question_batch_schema(),
        }
    }
}

#[async_trait]
impl BatchFetcher for GeminiBatchFetcher {
    async fn fetch_batch(
        &self,
        role: RoleType,
        batch_size: usize,
        batch_index: usize,
    ) -> Result<Vec<InterviewQuestion>, FetchError> {
        // Resolved per call so a key added after startup is picked up.
        let api_key = self.keys.resolve().ok_or_else(|| {
            error!("No API key found; refusing to call the generation endpoint");
            FetchError::MissingCredential(self.keys.source_names().join(", "))
        })?;

        let prompt = build_batch_prompt(role, batch_size, batch_index);
        let request = StructuredRequest {
            prompt: &prompt,
            schema: &self.schema,
            temperature: GENERATION_TEMPERATURE,
        };

        let raw = match self.llm.generate_structured(&api_key, request).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                warn!("Batch {} came back empty", batch_index);
                return Ok(Vec::new());
            }
            Err(e) if e.is_auth_failure() => {
                error!("Generation endpoint rejected the credential: {e}");
                return Err(FetchError::Authentication(e.to_string()));
            }
            Err(e) => {
                warn!("Batch {} failed: {e}", batch_index);
                return Err(FetchError::Transient(e));
            }
        };

        let questions = parse_batch(&raw, batch_size, batch_index)?;
        debug!("Batch {} parsed into {} questions", batch_index, questions.len());
        Ok(questions)
    }
}
