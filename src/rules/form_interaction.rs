use tokio_util::sync::CancellationToken;

use super::{cancelled, Rule};
use crate::extractor::PayloadExtractor;
use crate::model::{RiskFactor, Signal, SignalType};

pub struct FormInteractionRule;

const NAME: &str = "form_interaction_anomaly";
const WEIGHT: f64 = 0.15;
const MIN_CORRECTIONS_SAMPLES: usize = 4;
const MIN_PASTE_SAMPLES: usize = 2;

/// The SDK emits `timeToFillMs`; the rule as originally authored reads
/// `timeToFill`. Read both for forward compatibility.
fn time_to_fill(extractor: &PayloadExtractor) -> f64 {
    let v = extractor.get_double("timeToFill", 0.0);
    if v > 0.0 {
        v
    } else {
        extractor.get_double("timeToFillMs", 0.0)
    }
}

impl Rule for FormInteractionRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], cancellation: &CancellationToken) -> Option<RiskFactor> {
        let forms: Vec<&Signal> = signals
            .iter()
            .filter(|s| s.signal_type == SignalType::FormInteraction)
            .collect();

        if forms.is_empty() {
            return None;
        }

        let mut fill_times = Vec::new();
        let mut corrections = Vec::new();
        let mut paste_flags = Vec::new();

        for signal in &forms {
            if cancelled(cancellation) {
                return None;
            }
            let extractor = PayloadExtractor::new(&signal.payload);
            let fill = time_to_fill(&extractor);
            if fill > 0.0 {
                fill_times.push(fill);
            }
            corrections.push(extractor.get_int("corrections", 0));
            paste_flags.push(extractor.get_bool("pasteDetected", false));
        }

        let mut best: Option<(f64, &'static str)> = None;
        let mut consider = |score: f64, reason: &'static str| {
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, reason));
            }
        };

        if let Some(min) = fill_times.iter().cloned().fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.min(v)))
        }) {
            if min < 300.0 {
                consider(0.85, "Fields filled implausibly fast");
            } else {
                let avg = fill_times.iter().sum::<f64>() / fill_times.len() as f64;
                if avg < 500.0 {
                    consider(0.6, "Fields filled suspiciously fast");
                }
            }
        }

        if forms.len() >= MIN_CORRECTIONS_SAMPLES && corrections.iter().all(|&c| c == 0) {
            consider(0.4, "No typing corrections across all fields");
        }

        if forms.len() > MIN_PASTE_SAMPLES && !paste_flags.is_empty() && paste_flags.iter().all(|&p| p) {
            consider(0.5, "All fields filled via paste");
        }

        best.map(|(score, reason)| RiskFactor::new(NAME, score, WEIGHT, reason))
    }
}
