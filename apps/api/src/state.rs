use std::sync::Arc;

use crate::config::Config;
use crate::interview::session::SessionController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single interview session served by this process. Held in memory only.
    pub session: Arc<SessionController>,
    pub config: Config,
}
