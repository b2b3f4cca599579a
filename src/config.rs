//! Process-wide configuration, loaded once at startup from the environment.

use std::env;

/// Deployment environment. `Development` enables the debug signal-dump endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests_per_minute: 100,
        }
    }
}

/// Evaluator configuration.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub model_version: String,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            model_version: "1.0.0-dev".to_string(),
        }
    }
}

/// Application-wide configuration assembled once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub environment: Environment,
    pub rate_limit: RateLimitConfig,
    pub evaluator: EvaluatorConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let bind_addr =
            env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let environment = env::var("ENVIRONMENT")
            .map(|v| Environment::from_str(&v))
            .unwrap_or(Environment::Production);

        let rate_limit_enabled = env::var("RATE_LIMIT_ENABLED")
            .ok()
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(true);

        let max_requests_per_minute = env::var("RATE_LIMIT_MAX_REQUESTS_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(100);

        let model_version = env::var("EVALUATOR_MODEL_VERSION")
            .unwrap_or_else(|_| "1.0.0-dev".to_string());

        Self {
            bind_addr,
            environment,
            rate_limit: RateLimitConfig {
                enabled: rate_limit_enabled,
                max_requests_per_minute,
            },
            evaluator: EvaluatorConfig { model_version },
        }
    }
}
