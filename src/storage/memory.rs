//! Default storage implementations: concurrent hash maps keyed by session id,
//! with per-key append lists. Readers sort on demand.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::{AnalysisStore, SessionStore, SignalStore};
use crate::model::{FraudAnalysis, JsonMap, Session, Signal, SignalType};

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        client_id: String,
        device_fingerprint: String,
        metadata: Option<JsonMap>,
    ) -> anyhow::Result<Session> {
        let session = Session::new(client_id, device_fingerprint, metadata);
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Session>> {
        Ok(self.sessions.get(&id).map(|entry| entry.clone()))
    }

    async fn exists(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.sessions.contains_key(&id))
    }

    async fn complete(&self, id: Uuid) -> anyhow::Result<Option<Session>> {
        let Some(mut entry) = self.sessions.get_mut(&id) else {
            return Ok(None);
        };
        entry.completed_at = Some(Utc::now());
        Ok(Some(entry.clone()))
    }

    async fn list_by_client(&self, client_id: &str, limit: usize) -> anyhow::Result<Vec<Session>> {
        let mut matching: Vec<Session> = self
            .sessions
            .iter()
            .filter(|entry| entry.client_id == client_id)
            .map(|entry| entry.clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }
}

#[derive(Default)]
pub struct InMemorySignalStore {
    signals: DashMap<Uuid, Vec<Signal>>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SignalStore for InMemorySignalStore {
    async fn append(&self, session_id: Uuid, signals: Vec<Signal>) -> anyhow::Result<()> {
        // `entry` holds the shard's write lock for the duration of the closure,
        // so concurrent readers of this key never observe a partial extend.
        self.signals.entry(session_id).or_default().extend(signals);
        Ok(())
    }

    async fn get_by_session(&self, session_id: Uuid) -> anyhow::Result<Vec<Signal>> {
        let mut out = self
            .signals
            .get(&session_id)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        out.sort_by_key(|s| s.timestamp);
        Ok(out)
    }

    async fn count_by_session(&self, session_id: Uuid) -> anyhow::Result<usize> {
        Ok(self.signals.get(&session_id).map(|e| e.len()).unwrap_or(0))
    }

    async fn get_by_session_and_type(
        &self,
        session_id: Uuid,
        signal_type: SignalType,
    ) -> anyhow::Result<Vec<Signal>> {
        let mut out: Vec<Signal> = self
            .signals
            .get(&session_id)
            .map(|entry| {
                entry
                    .iter()
                    .filter(|s| s.signal_type == signal_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        out.sort_by_key(|s| s.timestamp);
        Ok(out)
    }

    async fn get_by_session_and_time_range(
        &self,
        session_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Signal>> {
        let mut out: Vec<Signal> = self
            .signals
            .get(&session_id)
            .map(|entry| {
                entry
                    .iter()
                    .filter(|s| s.timestamp >= start && s.timestamp <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        out.sort_by_key(|s| s.timestamp);
        Ok(out)
    }
}

#[derive(Default)]
pub struct InMemoryAnalysisStore {
    analyses: DashMap<Uuid, FraudAnalysis>,
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn save(&self, analysis: FraudAnalysis) -> anyhow::Result<()> {
        self.analyses.insert(analysis.session_id, analysis);
        Ok(())
    }

    async fn get_by_session(&self, session_id: Uuid) -> anyhow::Result<Option<FraudAnalysis>> {
        Ok(self.analyses.get(&session_id).map(|e| e.clone()))
    }

    async fn exists(&self, session_id: Uuid) -> anyhow::Result<bool> {
        Ok(self.analyses.contains_key(&session_id))
    }
}
