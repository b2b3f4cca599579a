//! The rule bank: nine pure, composable detectors over a
//! session's signals. Each rule is a stable-named pure function; returning
//! `None` means the rule did not fire.

mod bot_signature;
mod fingerprint_anomaly;
mod form_interaction;
mod headless_browser;
mod keystroke_dynamics;
mod mouse_pattern;
mod mouse_velocity;
mod session_pattern;
mod typing_speed;

pub use bot_signature::BotSignatureRule;
pub use fingerprint_anomaly::FingerprintAnomalyRule;
pub use form_interaction::FormInteractionRule;
pub use headless_browser::HeadlessBrowserRule;
pub use keystroke_dynamics::KeystrokeDynamicsRule;
pub use mouse_pattern::MousePatternRule;
pub use mouse_velocity::MouseVelocityRule;
pub use session_pattern::SessionPatternRule;
pub use typing_speed::TypingSpeedRule;

use tokio_util::sync::CancellationToken;

use crate::model::{RiskFactor, Signal};

/// A pure detector over a session's signals. Must not mutate shared state,
/// must honor cancellation in expensive loops, and must be safe to invoke
/// concurrently with itself on different inputs.
pub trait Rule: Send + Sync {
    /// Stable identifier used as the emitted `RiskFactor::name`.
    fn name(&self) -> &'static str;

    /// The rule's fixed weight, combined by the evaluator.
    fn weight(&self) -> f64;

    fn evaluate(&self, signals: &[Signal], cancellation: &CancellationToken) -> Option<RiskFactor>;
}

/// Builds the default nine rules in their canonical order.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(MouseVelocityRule),
        Box::new(MousePatternRule),
        Box::new(KeystrokeDynamicsRule),
        Box::new(TypingSpeedRule),
        Box::new(BotSignatureRule),
        Box::new(HeadlessBrowserRule),
        Box::new(FormInteractionRule),
        Box::new(SessionPatternRule),
        Box::new(FingerprintAnomalyRule),
    ]
}

/// Returns `true` when the loop should stop early because the caller cancelled.
pub(crate) fn cancelled(cancellation: &CancellationToken) -> bool {
    cancellation.is_cancelled()
}
