use tokio_util::sync::CancellationToken;

use super::{cancelled, Rule};
use crate::extractor::PayloadExtractor;
use crate::model::{RiskFactor, Signal, SignalType};

pub struct KeystrokeDynamicsRule;

const NAME: &str = "keystroke_dynamics_anomaly";
const WEIGHT: f64 = 0.2;
const MIN_SIGNALS: usize = 5;

impl Rule for KeystrokeDynamicsRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], cancellation: &CancellationToken) -> Option<RiskFactor> {
        let dynamics: Vec<&Signal> = signals
            .iter()
            .filter(|s| s.signal_type == SignalType::KeystrokeDynamics)
            .collect();

        if dynamics.len() < MIN_SIGNALS {
            return None;
        }

        let mut dwell_times = Vec::new();
        let mut flight_times = Vec::new();
        for signal in &dynamics {
            if cancelled(cancellation) {
                return None;
            }
            let extractor = PayloadExtractor::new(&signal.payload);
            let dwell = extractor.get_double("dwellTimeMs", 0.0);
            if dwell > 0.0 {
                dwell_times.push(dwell);
            }
            let flight = extractor.get_double("flightTimeMs", 0.0);
            if flight > 0.0 {
                flight_times.push(flight);
            }
        }

        let mut best: Option<(f64, &'static str)> = None;
        let mut consider = |score: f64, reason: &'static str| {
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, reason));
            }
        };

        if !dwell_times.is_empty() {
            let n = dwell_times.len() as f64;
            let avg_dwell = dwell_times.iter().sum::<f64>() / n;
            let variance = dwell_times.iter().map(|v| (v - avg_dwell).powi(2)).sum::<f64>() / n;
            let std_dev = variance.sqrt();

            if avg_dwell < 20.0 {
                consider(0.9, "Inhuman typing speed");
            } else if avg_dwell < 40.0 {
                consider(0.5, "Suspiciously fast typing");
            }

            if std_dev < 3.0 && dynamics.len() > 20 {
                consider(0.8, "Robotic consistency");
            } else if std_dev < 8.0 && dynamics.len() > 30 {
                consider(0.5, "Low variance in timing");
            }
        }

        if !flight_times.is_empty() {
            let avg_flight = flight_times.iter().sum::<f64>() / flight_times.len() as f64;
            if avg_flight < 30.0 && flight_times.len() > 10 {
                consider(0.6, "Rapid key transitions");
            }
        }

        best.map(|(score, reason)| RiskFactor::new(NAME, score, WEIGHT, reason))
    }
}
