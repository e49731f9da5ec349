use std::sync::Arc;

use exam_core::model::{AnswerKey, MockId, MockSummary};

use crate::api::ExamApi;
use crate::error::ApiError;

/// Read access to the mocks a user can take.
#[derive(Clone)]
pub struct MockCatalogService {
    api: Arc<dyn ExamApi>,
}

impl MockCatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the mock list cannot be fetched.
    pub async fn list_mocks(&self) -> Result<Vec<MockSummary>, ApiError> {
        self.api.fetch_mocks().await
    }

    /// Find one mock by id. The API has no single-mock endpoint, so this
    /// filters the list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the mock list cannot be fetched.
    pub async fn find_mock(&self, mock_id: &MockId) -> Result<Option<MockSummary>, ApiError> {
        let mocks = self.api.fetch_mocks().await?;
        Ok(mocks.into_iter().find(|mock| &mock.id == mock_id))
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the answer key cannot be fetched.
    pub async fn answer_key(&self, mock_id: &MockId) -> Result<AnswerKey, ApiError> {
        let mut key = self.api.view_answers(mock_id).await?;
        key.sections.sort_by_key(|section| section.sort_order);
        for section in &mut key.sections {
            section.questions.sort_by_key(|question| question.sort_order);
        }
        Ok(key)
    }
}
