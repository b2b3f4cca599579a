use tokio_util::sync::CancellationToken;

use super::{cancelled, Rule};
use crate::extractor::PayloadExtractor;
use crate::model::{RiskFactor, Signal, SignalType};

pub struct MousePatternRule;

const NAME: &str = "mouse_pattern_anomaly";
const WEIGHT: f64 = 0.1;
const MIN_SIGNALS: usize = 20;

impl Rule for MousePatternRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], cancellation: &CancellationToken) -> Option<RiskFactor> {
        let mut points: Vec<(&Signal, f64, f64)> = signals
            .iter()
            .filter(|s| s.signal_type == SignalType::MouseMove)
            .map(|s| {
                let extractor = PayloadExtractor::new(&s.payload);
                (s, extractor.get_double("x", 0.0), extractor.get_double("y", 0.0))
            })
            .collect();

        if points.len() < MIN_SIGNALS {
            return None;
        }
        points.sort_by_key(|(s, _, _)| s.timestamp);

        let mut straight_line = 0usize;
        let triples = points.len().saturating_sub(2);
        for window in points.windows(3) {
            if cancelled(cancellation) {
                return None;
            }
            let (_, x1, y1) = window[0];
            let (_, x2, y2) = window[1];
            let (_, x3, y3) = window[2];
            let cross = (y2 - y1) * (x3 - x2) - (y3 - y2) * (x2 - x1);
            if cross.abs() < 1.0 {
                straight_line += 1;
            }
        }

        let mut grid_snapped = 0usize;
        for (_, x, y) in &points {
            if cancelled(cancellation) {
                return None;
            }
            if x.rem_euclid(10.0) < 1.0 && y.rem_euclid(10.0) < 1.0 {
                grid_snapped += 1;
            }
        }

        let mut best: Option<(f64, &'static str)> = None;
        let mut consider = |score: f64, reason: &'static str| {
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, reason));
            }
        };

        if triples > 0 && (straight_line as f64 / triples as f64) > 0.8 {
            consider(0.7, "Too many straight-line movements");
        }
        if (grid_snapped as f64 / points.len() as f64) > 0.5 {
            consider(0.5, "Grid-snapping detected");
        }

        best.map(|(score, reason)| RiskFactor::new(NAME, score, WEIGHT, reason))
    }
}
