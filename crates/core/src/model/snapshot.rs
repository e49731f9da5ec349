use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AnswerSheet, AttemptId, MockId, StartedAttempt};
use crate::time::{remaining_seconds, within_window};

/// Locally persisted state of an unfinished attempt.
///
/// Remaining time is intentionally absent: it is always derived from
/// `start_time` and `duration_minutes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSnapshot {
    attempt_id: AttemptId,
    mock_id: MockId,
    attempt: StartedAttempt,
    answers: AnswerSheet,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    start_time: DateTime<Utc>,
    #[serde(rename = "duration")]
    duration_minutes: u32,
}

impl AttemptSnapshot {
    /// Capture a snapshot of `attempt` opened at `start_time`.
    #[must_use]
    pub fn new(attempt: StartedAttempt, answers: AnswerSheet, start_time: DateTime<Utc>) -> Self {
        Self {
            attempt_id: attempt.attempt_id.clone(),
            mock_id: attempt.mock_id.clone(),
            duration_minutes: attempt.duration_minutes,
            attempt,
            answers,
            start_time,
        }
    }

    #[must_use]
    pub fn attempt_id(&self) -> &AttemptId {
        &self.attempt_id
    }

    #[must_use]
    pub fn mock_id(&self) -> &MockId {
        &self.mock_id
    }

    #[must_use]
    pub fn attempt(&self) -> &StartedAttempt {
        &self.attempt
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Replace the answers; every other field is fixed for the snapshot's life.
    pub fn set_answers(&mut self, answers: AnswerSheet) {
        self.answers = answers;
    }

    #[must_use]
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        remaining_seconds(self.start_time, self.duration_minutes, now)
    }

    /// True while the attempt window is still open at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        within_window(self.start_time, self.duration_minutes, now)
    }

    /// Split into the pieces a controller restores from.
    #[must_use]
    pub fn into_parts(self) -> (StartedAttempt, AnswerSheet, DateTime<Utc>) {
        (self.attempt, self.answers, self.start_time)
    }
}
