//! Local persistence of unfinished attempts.
//!
//! Every operation here swallows backend and decoding failures after logging
//! them: losing local persistence only means "nothing to resume", so callers
//! never see a storage error from this layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use exam_core::Clock;
use exam_core::model::{AnswerSheet, AttemptId, AttemptSnapshot, MockId, StartedAttempt};

use crate::repository::{KeyValueStore, StorageError};

/// Namespace for attempt records in the key-value backend.
pub const STORAGE_PREFIX: &str = "test_attempt_";

/// Snapshot persistence keyed by mock id.
#[derive(Clone)]
pub struct LocalAttemptStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl LocalAttemptStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self { kv, clock }
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[must_use]
    pub fn key_for(mock_id: &MockId) -> String {
        format!("{STORAGE_PREFIX}{mock_id}")
    }

    /// Write a fresh snapshot for `mock_id` that starts now, replacing any
    /// previous one. Returns the recorded start time, even when the write failed.
    pub async fn save(
        &self,
        mock_id: &MockId,
        attempt: &StartedAttempt,
        answers: &AnswerSheet,
    ) -> DateTime<Utc> {
        let started_at = self.clock.now();
        let snapshot = AttemptSnapshot::new(attempt.clone(), answers.clone(), started_at);
        if let Err(err) = self.write(mock_id, &snapshot).await {
            tracing::warn!(%mock_id, error = %err, "failed to save attempt snapshot");
        }
        started_at
    }

    /// Replace the answers of an existing snapshot. Does nothing when no
    /// snapshot exists for `mock_id`.
    pub async fn update_answers(&self, mock_id: &MockId, answers: &AnswerSheet) {
        let Some(mut snapshot) = self.load(mock_id).await else {
            return;
        };
        snapshot.set_answers(answers.clone());
        if let Err(err) = self.write(mock_id, &snapshot).await {
            tracing::warn!(%mock_id, error = %err, "failed to update saved answers");
        }
    }

    /// Read the snapshot for `mock_id`; missing or unreadable records are `None`.
    pub async fn load(&self, mock_id: &MockId) -> Option<AttemptSnapshot> {
        let key = Self::key_for(mock_id);
        match self.kv.get(&key).await {
            Ok(Some(raw)) => decode(&key, &raw),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(%mock_id, error = %err, "failed to read attempt snapshot");
                None
            }
        }
    }

    /// Find a snapshot by attempt id across every stored mock.
    ///
    /// Records that fail to decode are skipped; a backend failure yields `None`.
    /// When several records carry the same attempt id the first key in backend
    /// order wins.
    pub async fn load_by_attempt_id(&self, attempt_id: &AttemptId) -> Option<AttemptSnapshot> {
        let keys = match self.kv.keys().await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(%attempt_id, error = %err, "failed to list attempt snapshots");
                return None;
            }
        };

        for key in keys.iter().filter(|key| key.starts_with(STORAGE_PREFIX)) {
            let raw = match self.kv.get(key).await {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%attempt_id, key = %key, error = %err, "failed to scan attempt snapshots");
                    return None;
                }
            };
            if let Some(snapshot) = decode(key, &raw) {
                if snapshot.attempt_id() == attempt_id {
                    return Some(snapshot);
                }
            }
        }
        None
    }

    /// Delete the snapshot for `mock_id`, if any.
    pub async fn clear(&self, mock_id: &MockId) {
        if let Err(err) = self.kv.remove(&Self::key_for(mock_id)).await {
            tracing::warn!(%mock_id, error = %err, "failed to clear attempt snapshot");
        }
    }

    /// Delete every stored attempt snapshot.
    pub async fn clear_all(&self) {
        let keys = match self.kv.keys().await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list attempt snapshots for cleanup");
                return;
            }
        };
        for key in keys.iter().filter(|key| key.starts_with(STORAGE_PREFIX)) {
            if let Err(err) = self.kv.remove(key).await {
                tracing::warn!(key = %key, error = %err, "failed to clear attempt snapshot");
            }
        }
    }

    /// True when a snapshot exists and its time window has not closed.
    pub async fn is_valid(&self, mock_id: &MockId) -> bool {
        self.load(mock_id)
            .await
            .is_some_and(|snapshot| snapshot.is_valid_at(self.clock.now()))
    }

    /// Seconds left on the stored attempt, floored at zero.
    pub async fn remaining_seconds(&self, mock_id: &MockId) -> Option<u64> {
        self.load(mock_id)
            .await
            .map(|snapshot| snapshot.remaining_seconds_at(self.clock.now()))
    }

    async fn write(&self, mock_id: &MockId, snapshot: &AttemptSnapshot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.set(&Self::key_for(mock_id), &raw).await
    }
}

fn decode(key: &str, raw: &str) -> Option<AttemptSnapshot> {
    match serde_json::from_str(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "discarding unreadable attempt snapshot");
            None
        }
    }
}
