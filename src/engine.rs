//! Ordered composition of the rule bank.

use tokio_util::sync::CancellationToken;

use crate::model::{RiskFactor, Signal};
use crate::rules::{default_rules, Rule};

pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// `None` selects the default nine rules in their specified order.
    pub fn new(rules: Option<Vec<Box<dyn Rule>>>) -> Self {
        let rules = match rules {
            Some(rules) if !rules.is_empty() => rules,
            _ => default_rules(),
        };
        Self { rules }
    }

    /// Invokes each rule serially in order, checking cancellation between
    /// rules, and appends each firing rule's `RiskFactor` to the output.
    pub async fn evaluate(&self, signals: &[Signal], cancellation: &CancellationToken) -> Vec<RiskFactor> {
        let mut factors = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if cancellation.is_cancelled() {
                break;
            }
            if let Some(factor) = rule.evaluate(signals, cancellation) {
                factors.push(factor);
            }
            tokio::task::yield_now().await;
        }
        factors
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(None)
    }
}
