//! Pluggable ML scoring capability. The core supplies a mock;
//! production replacements satisfy the same contract.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio_util::sync::CancellationToken;

use crate::model::{RiskFactor, Signal};

#[async_trait]
pub trait MlScorer: Send + Sync {
    async fn score(&self, signals: &[Signal], cancellation: &CancellationToken) -> anyhow::Result<Vec<RiskFactor>>;
}

/// Given >=1 signal, emits a single `ml_anomaly_score` factor with
/// probability ~50%, `score ~ Uniform(0, 0.5)`, `weight = 0.4`.
pub struct MockMlScorer {
    rng: Mutex<ChaCha8Rng>,
}

impl MockMlScorer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }
}

impl Default for MockMlScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MlScorer for MockMlScorer {
    async fn score(&self, signals: &[Signal], cancellation: &CancellationToken) -> anyhow::Result<Vec<RiskFactor>> {
        if signals.is_empty() || cancellation.is_cancelled() {
            return Ok(Vec::new());
        }

        let mut rng = self.rng.lock();
        if !rng.gen_bool(0.5) {
            return Ok(Vec::new());
        }
        let score: f64 = rng.gen_range(0.0..0.5);

        Ok(vec![RiskFactor::new(
            "ml_anomaly_score",
            score,
            0.4,
            "ML model anomaly detection score (MOCK)",
        )])
    }
}
