//! Session Controller: drives sequential batch fetches until the target total
//! is reached or a failure halts progress.
//!
//! Flow: begin (check-and-set the guard) → drive (fetch, append, derive the
//! next index from the accumulated count) → Complete | Stalled | Failed.
//! Reset returns to Idle from any state and invalidates in-flight responses.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::interview::fetcher::BatchFetcher;
use crate::interview::filter::filter_questions;
use crate::interview::models::{InterviewQuestion, RoleType};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Generating,
    Stalled,
    Failed,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or rejected credential. Needs a credential fix or a reset.
    Fatal,
    /// Any other failure. Progress is kept and the session can be resumed.
    Transient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session already holds role '{held}'; reset before switching to '{requested}'")]
    RoleConflict {
        held: RoleType,
        requested: RoleType,
    },
}

/// Fixed sizing of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub target_total: usize,
    pub batch_size: usize,
}

impl SessionSettings {
    pub fn total_batches(&self) -> usize {
        self.target_total.div_ceil(self.batch_size)
    }

    /// The next batch index is always derived from how many questions actually
    /// landed, never from a separate counter. A partly filled batch is
    /// requested again.
    pub fn next_batch_index(&self, loaded: usize) -> usize {
        loaded / self.batch_size
    }

    fn progress_percent(&self, loaded: usize) -> u8 {
        let percent = (loaded * 100 + self.target_total / 2) / self.target_total;
        percent.min(100) as u8
    }
}

/// Everything the rendering layer needs to draw the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub role: Option<RoleType>,
    pub role_label: Option<&'static str>,
    pub questions: Vec<InterviewQuestion>,
    pub loaded_count: usize,
    pub target_total: usize,
    pub batch_size: usize,
    pub total_batches: usize,
    pub progress_percent: u8,
    /// One-based number of the batch being (or next to be) fetched.
    pub current_batch: usize,
    pub is_generating: bool,
    pub error: Option<SessionErrorInfo>,
}

/// Proof that `begin` set the reentrancy guard. Consumed by `drive`.
#[derive(Debug)]
pub struct RunTicket {
    epoch: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    role: Option<RoleType>,
    questions: Vec<InterviewQuestion>,
    generating: bool,
    last_error: Option<SessionErrorInfo>,
    /// Bumped on reset; a loop whose ticket carries an older epoch is stale.
    epoch: u64,
}

impl SessionState {
    fn phase(&self, settings: &SessionSettings) -> SessionPhase {
        if self.generating {
            return SessionPhase::Generating;
        }
        match &self.last_error {
            Some(err) if err.kind == ErrorKind::Fatal => SessionPhase::Failed,
            Some(_) => SessionPhase::Stalled,
            None if self.role.is_none() => SessionPhase::Idle,
            None if self.questions.len() >= settings.target_total => SessionPhase::Complete,
            None => SessionPhase::Stalled,
        }
    }

    fn halt(&mut self, kind: ErrorKind, message: String) {
        self.generating = false;
        self.last_error = Some(SessionErrorInfo { kind, message });
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

/// Owns one session. Shared behind an `Arc` between the HTTP handlers and the
/// spawned generation loop.
pub struct SessionController {
    fetcher: Arc<dyn BatchFetcher>,
    settings: SessionSettings,
    state: Mutex<SessionState>,
}

impl SessionController {
    pub fn new(fetcher: Arc<dyn BatchFetcher>, settings: SessionSettings) -> Self {
        Self {
            fetcher,
            settings,
            state: Mutex::new(SessionState::default()),
        }
    }

    // The lock is never held across an await, so a poisoned lock still holds
    // consistent data.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks and sets the reentrancy guard without suspending.
    ///
    /// Returns `Ok(None)` when a loop is already in flight. On an idle session
    /// `role` selects the session's role (default when absent); afterwards the
    /// role is fixed until reset.
    pub fn begin(&self, role: Option<RoleType>) -> Result<Option<RunTicket>, SessionError> {
        let mut state = self.lock();
        if state.generating {
            debug!("Start requested while generating; ignoring");
            return Ok(None);
        }

        match (state.role, role) {
            (Some(held), Some(requested)) if held != requested => {
                return Err(SessionError::RoleConflict { held, requested });
            }
            (Some(_), _) => {}
            (None, requested) => state.role = Some(requested.unwrap_or_default()),
        }

        state.last_error = None;
        state.generating = true;

        info!(
            "Generation started for '{}' with {}/{} questions loaded",
            state.role.unwrap_or_default(),
            state.questions.len(),
            self.settings.target_total
        );

        Ok(Some(RunTicket { epoch: state.epoch }))
    }

    /// Runs the batch loop for a ticket obtained from `begin`.
    pub async fn drive(&self, ticket: RunTicket) -> SessionPhase {
        let settings = self.settings;
        loop {
            let (role, batch_index) = {
                let mut state = self.lock();
                if state.epoch != ticket.epoch || !state.generating {
                    return state.phase(&settings);
                }
                let loaded = state.questions.len();
                let batch_index = settings.next_batch_index(loaded);
                if loaded >= settings.target_total || batch_index >= settings.total_batches() {
                    state.generating = false;
                    info!("Session complete: {loaded} questions loaded");
                    return SessionPhase::Complete;
                }
                (state.role.unwrap_or_default(), batch_index)
            };

            info!(
                "Fetching batch {} (of {}) for '{}'",
                batch_index + 1,
                settings.total_batches(),
                role
            );
            let result = self
                .fetcher
                .fetch_batch(role, settings.batch_size, batch_index)
                .await;

            let mut state = self.lock();
            if state.epoch != ticket.epoch {
                debug!("Discarding batch {batch_index}: session was reset while it was in flight");
                return state.phase(&settings);
            }

            match result {
                Ok(batch) if batch.is_empty() => {
                    warn!("Batch {} produced no questions; stalling", batch_index + 1);
                    state.halt(
                        ErrorKind::Transient,
                        format!(
                            "No questions came back for batch {}. Try continuing.",
                            batch_index + 1
                        ),
                    );
                    return SessionPhase::Stalled;
                }
                Ok(batch) => {
                    let room = settings.target_total.saturating_sub(state.questions.len());
                    state.questions.extend(batch.into_iter().take(room));
                    debug!("Loaded {}/{}", state.questions.len(), settings.target_total);
                }
                Err(e) if e.is_fatal() => {
                    error!("Generation halted on batch {}: {e}", batch_index + 1);
                    state.halt(ErrorKind::Fatal, e.to_string());
                    return SessionPhase::Failed;
                }
                Err(e) => {
                    warn!("Batch {} failed, stalling: {e}", batch_index + 1);
                    state.halt(
                        ErrorKind::Transient,
                        format!(
                            "Network interruption on batch {}. Some questions may be missing.",
                            batch_index + 1
                        ),
                    );
                    return SessionPhase::Stalled;
                }
            }
        }
    }

    /// Starts (or resumes) the loop on a background task.
    /// Returns `false` when a loop was already running.
    pub fn spawn(self: &Arc<Self>, role: Option<RoleType>) -> Result<bool, SessionError> {
        let Some(ticket) = self.begin(role)? else {
            return Ok(false);
        };
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let phase = controller.drive(ticket).await;
            debug!("Generation loop finished in phase {phase:?}");
        });
        Ok(true)
    }

    /// Discards all accumulated data and returns to Idle.
    pub fn reset(&self) {
        let mut state = self.lock();
        let epoch = state.epoch.wrapping_add(1);
        *state = SessionState {
            epoch,
            ..SessionState::default()
        };
        info!("Session reset");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        let loaded = state.questions.len();
        SessionSnapshot {
            phase: state.phase(&self.settings),
            role: state.role,
            role_label: state.role.map(RoleType::label),
            questions: state.questions.clone(),
            loaded_count: loaded,
            target_total: self.settings.target_total,
            batch_size: self.settings.batch_size,
            total_batches: self.settings.total_batches(),
            progress_percent: self.settings.progress_percent(loaded),
            current_batch: self
                .settings
                .next_batch_index(loaded)
                .min(self.settings.total_batches().saturating_sub(1))
                + 1,
            is_generating: state.generating,
            error: state.last_error.clone(),
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.lock().questions.len()
    }

    /// Accumulated questions matching a topic filter, in load order.
    pub fn filtered(&self, filter: &str) -> Vec<InterviewQuestion> {
        let state = self.lock();
        filter_questions(&state.questions, filter)
            .into_iter()
            .cloned()
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
