//! Behavioral fraud detection engine — HTTP entry point.

mod api;
mod config;
mod engine;
mod error;
mod evaluator;
mod extractor;
mod middleware;
mod model;
mod rate_limit;
mod rules;
mod scorer;
mod storage;
mod validation;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::state::AppState;
use crate::config::Config;
use crate::engine::RuleEngine;
use crate::evaluator::Evaluator;
use crate::rate_limit::RateLimiter;
use crate::scorer::MockMlScorer;
use crate::storage::{InMemoryAnalysisStore, InMemorySessionStore, InMemorySignalStore};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env();
    info!(bind_addr = %config.bind_addr, environment = ?config.environment, "fraud engine starting");

    let engine = RuleEngine::default();
    let scorer: Arc<dyn crate::scorer::MlScorer> = Arc::new(MockMlScorer::new());
    let evaluator = Arc::new(Evaluator::new(
        engine,
        Some(scorer),
        config.evaluator.model_version.clone(),
    ));

    let state = AppState {
        sessions: Arc::new(InMemorySessionStore::new()),
        signals: Arc::new(InMemorySignalStore::new()),
        analyses: Arc::new(InMemoryAnalysisStore::new()),
        rate_limiter: Arc::new(RateLimiter::new(config.rate_limit.max_requests_per_minute)),
        evaluator,
        config: Arc::new(config.clone()),
        shutdown: CancellationToken::new(),
    };

    let app = api::build_router(state.clone());

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal(state.shutdown.clone()))
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received, cancelling in-flight work");
    token.cancel();
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraud_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
