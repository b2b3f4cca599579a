use tokio_util::sync::CancellationToken;

use super::Rule;
use crate::extractor::PayloadExtractor;
use crate::model::{RiskFactor, Signal, SignalType};

pub struct FingerprintAnomalyRule;

const NAME: &str = "fingerprint_anomaly";
const WEIGHT: f64 = 0.1;

fn primary_language_tag(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or(language)
        .trim()
        .to_ascii_lowercase()
}

impl Rule for FingerprintAnomalyRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], _cancellation: &CancellationToken) -> Option<RiskFactor> {
        let fingerprint = signals.iter().find(|s| s.signal_type == SignalType::Fingerprint)?;
        let device = signals.iter().find(|s| s.signal_type == SignalType::Device)?;

        let fp = PayloadExtractor::new(&fingerprint.payload);
        let dev = PayloadExtractor::new(&device.payload);

        let mut best: Option<(f64, &'static str)> = None;
        let mut consider = |score: f64, reason: &'static str| {
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, reason));
            }
        };

        if fingerprint.payload.contains_key("timezoneOffset") && device.payload.contains_key("timezoneOffset") {
            let fp_tz = fp.get_int("timezoneOffset", 0);
            let dev_tz = dev.get_int("timezoneOffset", 0);
            if (fp_tz - dev_tz).abs() > 60 {
                consider(0.6, "Timezone offset mismatch between device and fingerprint");
            }
        }

        if device.payload.contains_key("screenWidth") || device.payload.contains_key("screenHeight") {
            let width = dev.get_int("screenWidth", -1);
            let height = dev.get_int("screenHeight", -1);
            if width == 0 || height == 0 {
                consider(0.7, "Zero screen dimension reported");
            } else if (width == 800 && height == 600) || (width == 1 && height == 1) {
                consider(0.5, "Suspicious default screen dimensions");
            }
        }

        if let Some(device_lang) = dev.get_string("language") {
            if let Some(fp_languages) = fp.get_string("languages") {
                let primary = primary_language_tag(&device_lang);
                if !primary.is_empty() && !fp_languages.to_ascii_lowercase().contains(&primary) {
                    consider(0.4, "Device language not present in fingerprint languages");
                }
            }
        }

        best.map(|(score, reason)| RiskFactor::new(NAME, score, WEIGHT, reason))
    }
}
