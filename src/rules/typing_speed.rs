use tokio_util::sync::CancellationToken;

use super::{cancelled, Rule};
use crate::extractor::PayloadExtractor;
use crate::model::{RiskFactor, Signal, SignalType};

pub struct TypingSpeedRule;

const NAME: &str = "typing_speed_anomaly";
const WEIGHT: f64 = 0.15;

impl Rule for TypingSpeedRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], cancellation: &CancellationToken) -> Option<RiskFactor> {
        let mut wpm = None;
        for signal in signals {
            if cancelled(cancellation) {
                return None;
            }
            if signal.signal_type != SignalType::KeystrokeDynamics {
                continue;
            }
            match signal.payload.get("estimatedWpm") {
                Some(value) if !value.is_null() => {
                    wpm = Some(PayloadExtractor::new(&signal.payload).get_double("estimatedWpm", 0.0));
                    break;
                }
                _ => continue,
            }
        }

        let wpm = wpm?;

        if wpm > 150.0 {
            let score = (0.6 + (wpm - 150.0) / 200.0).min(0.95);
            Some(RiskFactor::new(NAME, score, WEIGHT, "Superhuman typing speed"))
        } else if wpm > 120.0 {
            let score = 0.3 + (wpm - 120.0) / 100.0;
            Some(RiskFactor::new(NAME, score, WEIGHT, "Very fast typing"))
        } else {
            None
        }
    }
}
