//! Shared application state threaded through every handler.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::evaluator::Evaluator;
use crate::rate_limit::RateLimiter;
use crate::storage::{AnalysisStore, SessionStore, SignalStore};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub signals: Arc<dyn SignalStore>,
    pub analyses: Arc<dyn AnalysisStore>,
    pub rate_limiter: Arc<RateLimiter>,
    pub evaluator: Arc<Evaluator>,
    pub config: Arc<Config>,
    /// Parent token; per-request children are derived from this so a
    /// graceful shutdown cancels in-flight evaluation work.
    pub shutdown: CancellationToken,
}
