//! Schema/size/enum validation performed before anything is stored.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{ApiError, FieldErrors};
use crate::model::{JsonMap, SignalType};

pub const MAX_CLIENT_ID_LEN: usize = 256;
pub const MAX_DEVICE_FINGERPRINT_LEN: usize = 512;
pub const MIN_SIGNAL_BATCH: usize = 1;
pub const MAX_SIGNAL_BATCH: usize = 1000;

pub struct RawSignal {
    pub signal_type: String,
    pub timestamp_ms: i64,
    pub payload: Option<JsonMap>,
}

pub fn validate_create_session(client_id: &str, device_fingerprint: &str) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    if client_id.trim().is_empty() {
        errors.entry("clientId".into()).or_default().push("clientId is required".into());
    } else if client_id.len() > MAX_CLIENT_ID_LEN {
        errors
            .entry("clientId".into())
            .or_default()
            .push(format!("clientId must be at most {MAX_CLIENT_ID_LEN} characters"));
    }

    if device_fingerprint.trim().is_empty() {
        errors
            .entry("deviceFingerprint".into())
            .or_default()
            .push("deviceFingerprint is required".into());
    } else if device_fingerprint.len() > MAX_DEVICE_FINGERPRINT_LEN {
        errors.entry("deviceFingerprint".into()).or_default().push(format!(
            "deviceFingerprint must be at most {MAX_DEVICE_FINGERPRINT_LEN} characters"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Validates a signal batch and returns the normalized (type, timestamp,
/// payload) tuples ready for appending.
pub fn validate_signal_batch(
    signals: &[RawSignal],
) -> Result<Vec<(SignalType, DateTime<Utc>, JsonMap)>, ApiError> {
    let mut errors = FieldErrors::new();

    if signals.len() < MIN_SIGNAL_BATCH || signals.len() > MAX_SIGNAL_BATCH {
        errors.entry("signals".into()).or_default().push(format!(
            "batch size must be between {MIN_SIGNAL_BATCH} and {MAX_SIGNAL_BATCH}, got {}",
            signals.len()
        ));
        return Err(ApiError::Validation(errors));
    }

    let mut normalized = Vec::with_capacity(signals.len());
    for (index, raw) in signals.iter().enumerate() {
        let field = format!("signals[{index}]");

        if raw.signal_type.trim().is_empty() {
            errors.entry(field.clone()).or_default().push("type is required".into());
        }
        if raw.timestamp_ms <= 0 {
            errors
                .entry(field.clone())
                .or_default()
                .push("timestamp must be a positive Unix-ms value".into());
        }
        if raw.payload.is_none() {
            errors.entry(field.clone()).or_default().push("payload must not be null".into());
        }

        if !errors.contains_key(&field) {
            if let Some(payload) = raw.payload.clone() {
                let signal_type = SignalType::normalize(&raw.signal_type);
                let timestamp = Utc
                    .timestamp_millis_opt(raw.timestamp_ms)
                    .single()
                    .unwrap_or_else(Utc::now);
                normalized.push((signal_type, timestamp, payload));
            }
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(ApiError::Validation(errors))
    }
}
