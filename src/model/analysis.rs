use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named (score, weight) pair emitted by a rule or a scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    pub description: String,
}

impl RiskFactor {
    pub fn new(name: impl Into<String>, score: f64, weight: f64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: score.clamp(0.0, 1.0),
            weight: weight.clamp(0.0, 1.0),
            description: description.into(),
        }
    }
}

/// The categorical output derived from the weighted confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Allow,
    Review,
    Block,
}

impl Verdict {
    /// `weightedScore < 0.3 -> ALLOW`; `< 0.7 -> REVIEW`; else `BLOCK`.
    pub fn from_score(confidence_score: f64) -> Self {
        if confidence_score < 0.3 {
            Verdict::Allow
        } else if confidence_score < 0.7 {
            Verdict::Review
        } else {
            Verdict::Block
        }
    }
}

/// One fraud verdict for a completed (or one-shot) session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudAnalysis {
    pub session_id: Uuid,
    pub verdict: Verdict,
    pub confidence_score: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub model_version: String,
    pub evaluated_at: DateTime<Utc>,
}
