use chrono::{DateTime, Utc};

use exam_core::model::{
    AnswerSheet, AttemptId, MockId, OptionId, QuestionId, StartedAttempt, SubmissionResult,
    SubmitAttemptRequest,
};
use exam_core::remaining_seconds;

/// Remaining time at or below which the low-time warning is raised.
pub const LOW_TIME_WARNING_SECS: u64 = 300;

/// Lifecycle phase of the attempt controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptPhase {
    #[default]
    Idle,
    Active,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Start,
    Submit,
    AutoSubmit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Fulfilled,
    Failed(String),
}

/// The most recent start or submit request and where it stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState {
    pub kind: RequestKind,
    pub status: RequestStatus,
}

impl RequestState {
    pub(crate) fn pending(kind: RequestKind) -> Self {
        Self {
            kind,
            status: RequestStatus::Pending,
        }
    }

    pub(crate) fn fulfilled(kind: RequestKind) -> Self {
        Self {
            kind,
            status: RequestStatus::Fulfilled,
        }
    }

    pub(crate) fn failed(kind: RequestKind, message: String) -> Self {
        Self {
            kind,
            status: RequestStatus::Failed(message),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            RequestStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// In-memory state of the attempt being taken.
///
/// `remaining_seconds` is a cache of the last recomputation from `started_at`;
/// it is never advanced on its own.
#[derive(Debug, Clone)]
pub struct AttemptSession {
    attempt: StartedAttempt,
    answers: AnswerSheet,
    started_at: DateTime<Utc>,
    remaining_seconds: u64,
    is_active: bool,
    warning_shown: bool,
}

impl AttemptSession {
    pub(crate) fn new(
        attempt: StartedAttempt,
        answers: AnswerSheet,
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let remaining_seconds = remaining_seconds(started_at, attempt.duration_minutes, now);
        Self {
            attempt,
            answers,
            started_at,
            remaining_seconds,
            is_active: true,
            warning_shown: false,
        }
    }

    #[must_use]
    pub fn attempt(&self) -> &StartedAttempt {
        &self.attempt
    }

    #[must_use]
    pub fn attempt_id(&self) -> &AttemptId {
        &self.attempt.attempt_id
    }

    #[must_use]
    pub fn mock_id(&self) -> &MockId {
        &self.attempt.mock_id
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// True while the countdown is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.answers.unanswered_in(&self.attempt)
    }

    /// Seconds used so far, as reported on a manual submit.
    #[must_use]
    pub fn time_taken_secs(&self) -> u64 {
        self.attempt
            .duration_secs()
            .saturating_sub(self.remaining_seconds)
    }

    pub(crate) fn refresh(&mut self, now: DateTime<Utc>) -> u64 {
        self.remaining_seconds =
            remaining_seconds(self.started_at, self.attempt.duration_minutes, now);
        self.remaining_seconds
    }

    /// Consume the one-shot low-time warning if it is due.
    pub(crate) fn take_warning(&mut self) -> bool {
        let due = !self.warning_shown
            && self.remaining_seconds > 0
            && self.remaining_seconds <= LOW_TIME_WARNING_SECS;
        if due {
            self.warning_shown = true;
        }
        due
    }

    pub(crate) fn select(&mut self, question_id: QuestionId, option_id: Option<OptionId>) {
        self.answers.select(question_id, option_id);
    }

    pub(crate) fn expire(&mut self) {
        self.remaining_seconds = 0;
        self.is_active = false;
    }

    pub(crate) fn stop(&mut self) {
        self.is_active = false;
    }

    pub(crate) fn submission(&self, time_taken: u64) -> SubmitAttemptRequest {
        SubmitAttemptRequest {
            attempt_id: self.attempt.attempt_id.clone(),
            answers: self.answers.submissions_for(&self.attempt),
            time_taken: Some(time_taken),
        }
    }
}

/// Countdown reading after a start, resume or tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub remaining_seconds: u64,
    /// Set exactly once per session, the first time the countdown is at or
    /// under `LOW_TIME_WARNING_SECS`.
    pub warning: bool,
}

/// A start request that has been admitted and awaits the server's answer.
#[derive(Debug)]
pub struct PendingStart {
    pub(crate) mock_id: MockId,
}

impl PendingStart {
    #[must_use]
    pub fn mock_id(&self) -> &MockId {
        &self.mock_id
    }
}

/// A submission that has been admitted and awaits the server's answer.
#[derive(Debug)]
pub struct PendingSubmit {
    pub(crate) mock_id: MockId,
    pub(crate) kind: RequestKind,
    pub(crate) request: SubmitAttemptRequest,
}

impl PendingSubmit {
    #[must_use]
    pub fn mock_id(&self) -> &MockId {
        &self.mock_id
    }

    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    #[must_use]
    pub fn request(&self) -> &SubmitAttemptRequest {
        &self.request
    }
}

/// Synchronous result of advancing the countdown; `TimeUp` hands back the
/// auto-submission the caller must send.
#[derive(Debug)]
pub enum CountdownStep {
    Ignored,
    Running(Countdown),
    TimeUp(PendingSubmit),
}

/// Result of advancing the countdown with the auto-submission already sent.
#[derive(Debug, PartialEq)]
pub enum CountdownOutcome {
    Ignored,
    Running(Countdown),
    AutoSubmitted(Box<SubmissionResult>),
}
