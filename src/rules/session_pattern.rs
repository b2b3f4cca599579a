use tokio_util::sync::CancellationToken;

use super::{cancelled, Rule};
use crate::model::{RiskFactor, Signal, SignalType};

pub struct SessionPatternRule;

const NAME: &str = "session_pattern_anomaly";
const WEIGHT: f64 = 0.1;

impl Rule for SessionPatternRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], cancellation: &CancellationToken) -> Option<RiskFactor> {
        if signals.is_empty() {
            return None;
        }

        let mut has_device = false;
        let mut has_fingerprint = false;
        let mut has_mouse = false;
        let mut min_ts = signals[0].timestamp;
        let mut max_ts = signals[0].timestamp;

        for signal in signals {
            if cancelled(cancellation) {
                return None;
            }
            match signal.signal_type {
                SignalType::Device => has_device = true,
                SignalType::Fingerprint => has_fingerprint = true,
                SignalType::MouseMove | SignalType::MouseClick => has_mouse = true,
                _ => {}
            }
            if signal.timestamp < min_ts {
                min_ts = signal.timestamp;
            }
            if signal.timestamp > max_ts {
                max_ts = signal.timestamp;
            }
        }

        let mut best: Option<(f64, &'static str)> = None;
        let mut consider = |score: f64, reason: &'static str| {
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, reason));
            }
        };

        if !has_device || !has_fingerprint {
            consider(0.7, "Missing device/fingerprint signals");
        }
        if signals.len() > 10 && !has_mouse {
            consider(0.4, "No mouse activity detected");
        }

        let duration_ms = (max_ts - min_ts).num_milliseconds().max(0) as f64;
        if duration_ms < 1000.0 && signals.len() > 20 {
            consider(0.8, "Rapid session");
        }

        let duration_secs = duration_ms / 1000.0;
        let rate = if duration_secs > 0.0 {
            signals.len() as f64 / duration_secs
        } else if signals.len() > 1 {
            f64::INFINITY
        } else {
            0.0
        };
        if rate > 50.0 {
            consider(0.6, "High signal rate");
        }

        best.map(|(score, reason)| RiskFactor::new(NAME, score, WEIGHT, reason))
    }
}
