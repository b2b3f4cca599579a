//! Storage contracts: opaque-UUID-keyed session/signal/analysis
//! stores, safe for concurrent invocation from many request handlers.

mod memory;

pub use memory::{InMemoryAnalysisStore, InMemorySessionStore, InMemorySignalStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{FraudAnalysis, JsonMap, Session, Signal, SignalType};

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, client_id: String, device_fingerprint: String, metadata: Option<JsonMap>) -> anyhow::Result<Session>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Session>>;
    async fn exists(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Sets `completed_at` to now. Idempotent on repeat, but updates the timestamp each call.
    async fn complete(&self, id: Uuid) -> anyhow::Result<Option<Session>>;
    /// Sessions for a client, ordered by `created_at` descending.
    async fn list_by_client(&self, client_id: &str, limit: usize) -> anyhow::Result<Vec<Session>>;
}

#[async_trait]
pub trait SignalStore: Send + Sync {
    async fn append(&self, session_id: Uuid, signals: Vec<Signal>) -> anyhow::Result<()>;
    /// Sorted ascending by timestamp.
    async fn get_by_session(&self, session_id: Uuid) -> anyhow::Result<Vec<Signal>>;
    async fn count_by_session(&self, session_id: Uuid) -> anyhow::Result<usize>;
    async fn get_by_session_and_type(&self, session_id: Uuid, signal_type: SignalType) -> anyhow::Result<Vec<Signal>>;
    /// Inclusive bounds.
    async fn get_by_session_and_time_range(
        &self,
        session_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Signal>>;
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Last-writer-wins on `session_id`.
    async fn save(&self, analysis: FraudAnalysis) -> anyhow::Result<()>;
    async fn get_by_session(&self, session_id: Uuid) -> anyhow::Result<Option<FraudAnalysis>>;
    async fn exists(&self, session_id: Uuid) -> anyhow::Result<bool>;
}
