//! Boundary to the exam backend.

use async_trait::async_trait;

use exam_core::model::{
    AnswerKey, AttemptDetails, AttemptId, AttemptSummary, MockId, MockSummary, StartedAttempt,
    SubmissionResult, SubmitAttemptRequest,
};

use crate::error::ApiError;

mod http;

pub use http::HttpExamApi;

/// Remote operations the client needs from the exam backend.
///
/// Implementations never retry; every failure goes straight back to the caller.
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// List the mocks available to the current user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn fetch_mocks(&self) -> Result<Vec<MockSummary>, ApiError>;

    /// Open a new attempt on the server and return the paper.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn start_attempt(&self, mock_id: &MockId) -> Result<StartedAttempt, ApiError>;

    /// Submit answers for grading.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
    ) -> Result<SubmissionResult, ApiError>;

    /// Fetch the answer key for a mock.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn view_answers(&self, mock_id: &MockId) -> Result<AnswerKey, ApiError>;

    /// List the current user's past and ongoing attempts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn fetch_user_attempts(&self) -> Result<Vec<AttemptSummary>, ApiError>;

    /// Fetch per-question details of one attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn fetch_attempt_details(&self, attempt_id: &AttemptId)
    -> Result<AttemptDetails, ApiError>;
}
