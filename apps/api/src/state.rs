use std::sync::Arc;

use crate::bank::QuestionBank;
use crate::config::Config;
use crate::grading::Grader;
use crate::interview::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is read-only after startup except `sessions`, which is
/// the in-memory interview store. Callers are expected to serialize calls
/// per session; the store lock only protects the map itself.
#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<QuestionBank>,
    /// Pluggable grader. Default: `GeminiGrader`; tests swap in stubs.
    pub grader: Arc<dyn Grader>,
    pub sessions: SessionStore,
    pub config: Config,
}
