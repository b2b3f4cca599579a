//! Shared test scaffolding for the HTTP integration suite: builds an
//! `AppState` wired the same way `main.rs` does, without touching the
//! network (routes are exercised in-process via `tower::ServiceExt::oneshot`).

use std::sync::Arc;

use fraud_engine::api::state::AppState;
use fraud_engine::config::{Config, EvaluatorConfig, Environment, RateLimitConfig};
use fraud_engine::engine::RuleEngine;
use fraud_engine::evaluator::Evaluator;
use fraud_engine::rate_limit::RateLimiter;
use fraud_engine::scorer::MlScorer;
use fraud_engine::storage::{InMemoryAnalysisStore, InMemorySessionStore, InMemorySignalStore};
use tokio_util::sync::CancellationToken;

/// A scorer that never fires, so tests can assert on rule-only scores
/// without the mock ML scorer's randomness.
pub struct NoopScorer;

#[async_trait::async_trait]
impl MlScorer for NoopScorer {
    async fn score(
        &self,
        _signals: &[fraud_engine::model::Signal],
        _cancellation: &CancellationToken,
    ) -> anyhow::Result<Vec<fraud_engine::model::RiskFactor>> {
        Ok(Vec::new())
    }
}

pub fn test_state(max_requests_per_minute: u32, environment: Environment) -> AppState {
    let engine = RuleEngine::default();
    let scorer: Arc<dyn MlScorer> = Arc::new(NoopScorer);
    let evaluator = Arc::new(Evaluator::new(engine, Some(scorer), "1.0.0-test".to_string()));

    AppState {
        sessions: Arc::new(InMemorySessionStore::new()),
        signals: Arc::new(InMemorySignalStore::new()),
        analyses: Arc::new(InMemoryAnalysisStore::new()),
        rate_limiter: Arc::new(RateLimiter::new(max_requests_per_minute)),
        evaluator,
        config: Arc::new(Config {
            bind_addr: "0.0.0.0:0".to_string(),
            environment,
            rate_limit: RateLimitConfig {
                enabled: true,
                max_requests_per_minute,
            },
            evaluator: EvaluatorConfig {
                model_version: "1.0.0-test".to_string(),
            },
        }),
        shutdown: CancellationToken::new(),
    }
}
