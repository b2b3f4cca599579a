use tokio_util::sync::CancellationToken;

use super::{cancelled, Rule};
use crate::extractor::PayloadExtractor;
use crate::model::{RiskFactor, Signal, SignalType};

pub struct MouseVelocityRule;

const NAME: &str = "mouse_velocity_anomaly";
const WEIGHT: f64 = 0.15;
const MIN_SIGNALS: usize = 10;

impl Rule for MouseVelocityRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], cancellation: &CancellationToken) -> Option<RiskFactor> {
        let mut velocities = Vec::new();
        for signal in signals {
            if cancelled(cancellation) {
                return None;
            }
            if signal.signal_type != SignalType::MouseMove {
                continue;
            }
            let extractor = PayloadExtractor::new(&signal.payload);
            velocities.push(extractor.get_double("velocity", 0.0));
        }

        if velocities.len() < MIN_SIGNALS {
            return None;
        }
        if !velocities.iter().any(|&v| v > 0.0) {
            return None;
        }

        let n = velocities.len() as f64;
        let mean = velocities.iter().sum::<f64>() / n;
        let max = velocities.iter().cloned().fold(f64::MIN, f64::max);
        let variance = velocities.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        let cv = if mean != 0.0 { std_dev / mean } else { 0.0 };

        let mut best: Option<(f64, &'static str)> = None;
        let mut consider = |score: f64, reason: &'static str| {
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, reason));
            }
        };

        if max > 50.0 {
            consider((0.5 + (max - 50.0) / 100.0).min(0.9), "Extreme velocity");
        } else if max > 35.0 {
            consider(0.3, "High velocity");
        }

        if cv < 0.1 && velocities.len() >= 50 {
            consider(0.6, "Robotic consistency");
        }

        best.map(|(score, reason)| RiskFactor::new(NAME, score, WEIGHT, reason))
    }
}
