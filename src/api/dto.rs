//! Wire-facing request/response DTOs. Kept distinct from the
//! domain model so internal fields never leak onto the wire by accident.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::JsonMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub client_id: String,
    pub device_fingerprint: String,
    #[serde(default)]
    pub metadata: Option<JsonMap>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SignalInput {
    #[serde(rename = "type")]
    pub signal_type: String,
    pub timestamp: i64,
    #[serde(default)]
    pub payload: Option<JsonMap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSignalsRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub signals: Vec<SignalInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSignalsResponse {
    pub session_id: Uuid,
    pub signals_received: usize,
    pub total_signals: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSessionResponse {
    pub session_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub signal_count: usize,
    pub analysis_available: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub session_id: Uuid,
    pub signals: Vec<SignalInput>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryResponse {
    pub id: Uuid,
    pub client_id: String,
    pub device_fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<crate::model::Session> for SessionSummaryResponse {
    fn from(session: crate::model::Session) -> Self {
        Self {
            id: session.id,
            client_id: session.client_id,
            device_fingerprint: session.device_fingerprint,
            created_at: session.created_at,
            completed_at: session.completed_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSignalResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub signal_type: &'static str,
    pub timestamp: DateTime<Utc>,
    pub payload: JsonMap,
}

impl From<crate::model::Signal> for DebugSignalResponse {
    fn from(signal: crate::model::Signal) -> Self {
        Self {
            id: signal.id,
            signal_type: signal.signal_type.as_str(),
            timestamp: signal.timestamp,
            payload: signal.payload,
        }
    }
}
