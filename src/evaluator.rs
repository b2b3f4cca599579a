//! Weighted aggregation of rule and scorer output into a single verdict.

use std::sync::Arc;
use uuid::Uuid;

use tokio_util::sync::CancellationToken;

use crate::engine::RuleEngine;
use crate::model::{FraudAnalysis, RiskFactor, Session, Signal, Verdict};
use crate::scorer::MlScorer;

pub struct Evaluator {
    engine: RuleEngine,
    scorer: Option<Arc<dyn MlScorer>>,
    model_version: String,
}

impl Evaluator {
    pub fn new(engine: RuleEngine, scorer: Option<Arc<dyn MlScorer>>, model_version: String) -> Self {
        Self {
            engine,
            scorer,
            model_version,
        }
    }

    pub async fn evaluate(
        &self,
        session_id: Uuid,
        signals: &[Signal],
        cancellation: &CancellationToken,
    ) -> anyhow::Result<FraudAnalysis> {
        let mut factors = self.engine.evaluate(signals, cancellation).await;

        if !cancellation.is_cancelled() {
            if let Some(scorer) = &self.scorer {
                let mut ml_factors = scorer.score(signals, cancellation).await?;
                factors.append(&mut ml_factors);
            }
        }

        let confidence_score = weighted_score(&factors);
        let verdict = Verdict::from_score(confidence_score);

        Ok(FraudAnalysis {
            session_id,
            verdict,
            confidence_score,
            risk_factors: factors,
            model_version: self.model_version.clone(),
            evaluated_at: chrono::Utc::now(),
        })
    }

    /// Convenience wrapper taking the owning `Session`, for callers that
    /// already have the record at hand.
    pub async fn evaluate_session(
        &self,
        session: &Session,
        signals: &[Signal],
        cancellation: &CancellationToken,
    ) -> anyhow::Result<FraudAnalysis> {
        self.evaluate(session.id, signals, cancellation).await
    }
}

fn weighted_score(factors: &[RiskFactor]) -> f64 {
    let total_weight: f64 = factors.iter().map(|f| f.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = factors.iter().map(|f| f.score * f.weight).sum();
    (weighted_sum / total_weight).clamp(0.0, 1.0)
}
