//! Typed records for the session/signal/analysis data model.

mod analysis;
mod session;
mod signal;

pub use analysis::{FraudAnalysis, RiskFactor, Verdict};
pub use session::Session;
pub use signal::{Signal, SignalType};

use std::collections::HashMap;

/// A heterogeneous JSON object as received on the wire.
pub type JsonMap = HashMap<String, serde_json::Value>;
