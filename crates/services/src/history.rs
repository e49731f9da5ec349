use std::sync::Arc;

use exam_core::model::{AttemptDetails, AttemptId, AttemptSummary};

use crate::api::ExamApi;
use crate::error::ApiError;

/// The user's past and ongoing attempts.
#[derive(Clone)]
pub struct AttemptHistoryService {
    api: Arc<dyn ExamApi>,
}

impl AttemptHistoryService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>) -> Self {
        Self { api }
    }

    /// Attempts, most recently started first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the history cannot be fetched.
    pub async fn list_attempts(&self) -> Result<Vec<AttemptSummary>, ApiError> {
        let mut attempts = self.api.fetch_user_attempts().await?;
        attempts.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(attempts)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the details cannot be fetched.
    pub async fn attempt_details(&self, attempt_id: &AttemptId) -> Result<AttemptDetails, ApiError> {
        let mut details = self.api.fetch_attempt_details(attempt_id).await?;
        details.sections.sort_by_key(|section| section.sort_order);
        for section in &mut details.sections {
            section.questions.sort_by_key(|question| question.sort_order);
        }
        Ok(details)
    }
}
