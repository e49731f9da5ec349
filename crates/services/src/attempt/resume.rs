//! Deciding between resuming a saved attempt and starting a new one.

use exam_core::model::{AttemptId, MockId};
use storage::LocalAttemptStore;

use super::state::Countdown;

/// A resumable attempt found for the mock the user is about to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeOffer {
    pub mock_id: MockId,
    pub attempt_id: AttemptId,
    pub title: String,
    pub remaining_seconds: u64,
    pub answered: usize,
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeDecision {
    /// The user must pick; the choice is never made for them.
    Offer(ResumeOffer),
    StartFresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeChoice {
    Resume,
    StartNew,
}

/// Result of asking the controller to start a mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    ChooseResume(ResumeOffer),
    Started(Countdown),
}

/// Look at the saved snapshot for `mock_id`.
///
/// A snapshot that is still inside its window with time left yields an offer.
/// Anything else is discarded and the caller should start fresh.
pub async fn decide(store: &LocalAttemptStore, mock_id: &MockId) -> ResumeDecision {
    let Some(snapshot) = store.load(mock_id).await else {
        return ResumeDecision::StartFresh;
    };

    let now = store.clock().now();
    let remaining_seconds = snapshot.remaining_seconds_at(now);
    if snapshot.is_valid_at(now) && remaining_seconds > 0 {
        return ResumeDecision::Offer(ResumeOffer {
            mock_id: mock_id.clone(),
            attempt_id: snapshot.attempt_id().clone(),
            title: snapshot.attempt().title.clone(),
            remaining_seconds,
            answered: snapshot.answers().answered_count(),
            total_questions: snapshot.attempt().total_questions(),
        });
    }

    tracing::info!(%mock_id, attempt_id = %snapshot.attempt_id(), "discarding expired attempt snapshot");
    store.clear(mock_id).await;
    ResumeDecision::StartFresh
}
