use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::JsonMap;

/// The closed signal taxonomy. Unrecognized wire values normalize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    MouseMove,
    MouseClick,
    Keystroke,
    KeystrokeDynamics,
    Scroll,
    Touch,
    Visibility,
    Focus,
    Paste,
    Device,
    Performance,
    Fingerprint,
    FormInteraction,
    Accelerometer,
    Gyroscope,
    AppLifecycle,
    JailbreakDetection,
    RootDetection,
    Unknown,
}

impl SignalType {
    /// Normalizes a wire value (snake_case or camelCase, either casing) by
    /// stripping underscores and lower-casing before mapping. Idempotent:
    /// `normalize(normalize(x).as_str()) == normalize(x)`.
    pub fn normalize(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| *c != '_')
            .flat_map(|c| c.to_lowercase())
            .collect();

        match key.as_str() {
            "mousemove" => SignalType::MouseMove,
            "mouseclick" => SignalType::MouseClick,
            "keystroke" => SignalType::Keystroke,
            "keystrokedynamics" => SignalType::KeystrokeDynamics,
            "scroll" => SignalType::Scroll,
            "touch" => SignalType::Touch,
            "visibility" => SignalType::Visibility,
            "focus" => SignalType::Focus,
            "paste" => SignalType::Paste,
            "device" => SignalType::Device,
            "performance" => SignalType::Performance,
            "fingerprint" => SignalType::Fingerprint,
            "forminteraction" => SignalType::FormInteraction,
            "accelerometer" => SignalType::Accelerometer,
            "gyroscope" => SignalType::Gyroscope,
            "applifecycle" => SignalType::AppLifecycle,
            "jailbreakdetection" => SignalType::JailbreakDetection,
            "rootdetection" => SignalType::RootDetection,
            _ => SignalType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::MouseMove => "mouse_move",
            SignalType::MouseClick => "mouse_click",
            SignalType::Keystroke => "keystroke",
            SignalType::KeystrokeDynamics => "keystroke_dynamics",
            SignalType::Scroll => "scroll",
            SignalType::Touch => "touch",
            SignalType::Visibility => "visibility",
            SignalType::Focus => "focus",
            SignalType::Paste => "paste",
            SignalType::Device => "device",
            SignalType::Performance => "performance",
            SignalType::Fingerprint => "fingerprint",
            SignalType::FormInteraction => "form_interaction",
            SignalType::Accelerometer => "accelerometer",
            SignalType::Gyroscope => "gyroscope",
            SignalType::AppLifecycle => "app_lifecycle",
            SignalType::JailbreakDetection => "jailbreak_detection",
            SignalType::RootDetection => "root_detection",
            SignalType::Unknown => "unknown",
        }
    }
}

/// An immutable behavioral measurement belonging to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: Uuid,
    pub session_id: Uuid,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub timestamp: DateTime<Utc>,
    pub payload: JsonMap,
}

impl Signal {
    pub fn new(session_id: Uuid, signal_type: SignalType, timestamp: DateTime<Utc>, payload: JsonMap) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            signal_type,
            timestamp,
            payload,
        }
    }
}
