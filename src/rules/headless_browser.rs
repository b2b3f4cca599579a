use tokio_util::sync::CancellationToken;

use super::Rule;
use crate::extractor::PayloadExtractor;
use crate::model::{RiskFactor, Signal, SignalType};

pub struct HeadlessBrowserRule;

const NAME: &str = "headless_browser_detected";
const WEIGHT: f64 = 0.2;

fn missing_or_placeholder(value: Option<String>, min_len: usize) -> bool {
    match value {
        None => true,
        Some(v) => {
            let trimmed = v.trim();
            trimmed.is_empty() || trimmed == "0" || trimmed.len() < min_len
        }
    }
}

impl Rule for HeadlessBrowserRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], _cancellation: &CancellationToken) -> Option<RiskFactor> {
        let fingerprint = signals.iter().find(|s| s.signal_type == SignalType::Fingerprint);
        let device = signals.iter().find(|s| s.signal_type == SignalType::Device);

        if fingerprint.is_none() && device.is_none() {
            return None;
        }

        let mut best: Option<(f64, &'static str)> = None;
        let mut consider = |score: f64, reason: &'static str| {
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, reason));
            }
        };

        if let Some(fp) = fingerprint {
            let extractor = PayloadExtractor::new(&fp.payload);

            if missing_or_placeholder(extractor.get_string("canvas"), 8) {
                consider(0.6, "Missing/invalid canvas fingerprint");
            }
            if missing_or_placeholder(extractor.get_string("webgl"), 1) {
                consider(0.5, "Missing WebGL fingerprint");
            }
            if let Some(renderer) = extractor.get_string("webglRenderer") {
                let lower = renderer.to_ascii_lowercase();
                if lower.contains("swiftshader") || (lower.contains("mesa") && lower.contains("llvmpipe")) {
                    consider(0.7, "Software renderer detected");
                }
            }
            if missing_or_placeholder(extractor.get_string("audio"), 1) {
                consider(0.4, "Missing audio fingerprint");
            }
        }

        if let Some(dev) = device {
            let extractor = PayloadExtractor::new(&dev.payload);
            if extractor.get_bool("webdriver", false) {
                consider(0.95, "navigator.webdriver is true");
            }
            if dev.payload.get("pluginCount").is_some() && extractor.get_int("pluginCount", -1) == 0 {
                consider(0.5, "No browser plugins detected");
            }
        }

        best.map(|(score, reason)| RiskFactor::new(NAME, score, WEIGHT, reason))
    }
}
