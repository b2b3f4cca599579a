use tokio_util::sync::CancellationToken;

use super::Rule;
use crate::extractor::PayloadExtractor;
use crate::model::{RiskFactor, Signal, SignalType};

pub struct BotSignatureRule;

const NAME: &str = "bot_signature_detected";
const WEIGHT: f64 = 0.25;

const BOT_TOKENS: &[&str] = &[
    "HeadlessChrome",
    "PhantomJS",
    "Selenium",
    "WebDriver",
    "Puppeteer",
    "Playwright",
    "Nightmare",
    "CasperJS",
    "SlimerJS",
    "Zombie",
    "HtmlUnit",
];

const SUSPICIOUS_SUBSTRINGS: &[&str] = &["bot", "crawler", "spider", "scraper", "automation"];

impl Rule for BotSignatureRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn weight(&self) -> f64 {
        WEIGHT
    }

    fn evaluate(&self, signals: &[Signal], _cancellation: &CancellationToken) -> Option<RiskFactor> {
        let device = signals.iter().find(|s| s.signal_type == SignalType::Device)?;
        let user_agent = PayloadExtractor::new(&device.payload).get_string("userAgent")?;
        let lower = user_agent.to_ascii_lowercase();

        for token in BOT_TOKENS {
            if lower.contains(&token.to_ascii_lowercase()) {
                return Some(RiskFactor::new(
                    NAME,
                    0.95,
                    WEIGHT,
                    format!("Bot user agent token detected: {token}"),
                ));
            }
        }

        let matched: Vec<&str> = SUSPICIOUS_SUBSTRINGS
            .iter()
            .filter(|pattern| lower.contains(*pattern))
            .copied()
            .collect();

        if matched.is_empty() {
            return None;
        }

        Some(RiskFactor::new(
            NAME,
            0.7,
            WEIGHT,
            format!("Suspicious user agent pattern(s): {}", matched.join(", ")),
        ))
    }
}
