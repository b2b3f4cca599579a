use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::JsonMap;

/// A session groups the signals captured during one user interaction window.
///
/// Mutated exactly once by the core: `completed_at` is set when the client
/// calls `/complete`. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub client_id: String,
    pub device_fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub metadata: Option<JsonMap>,
}

impl Session {
    pub fn new(client_id: String, device_fingerprint: String, metadata: Option<JsonMap>) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            device_fingerprint,
            created_at: Utc::now(),
            completed_at: None,
            metadata,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
