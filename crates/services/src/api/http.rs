use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use exam_core::model::{
    AnswerKey, AttemptDetails, AttemptId, AttemptSummary, MockId, MockSummary, StartedAttempt,
    SubmissionResult, SubmitAttemptRequest,
};

use super::ExamApi;
use crate::config::ClientConfig;
use crate::error::ApiError;

/// `ExamApi` over HTTP with JSON bodies and bearer authentication.
#[derive(Clone)]
pub struct HttpExamApi {
    client: Client,
    config: ClientConfig,
}

impl HttpExamApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let response = self.authorize(self.client.get(url)).send().await?;
        decode(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.config.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        tracing::warn!(%status, detail = message.as_deref().unwrap_or(""), "exam api error");
        return Err(ApiError::Status { status, message });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl ExamApi for HttpExamApi {
    async fn fetch_mocks(&self) -> Result<Vec<MockSummary>, ApiError> {
        let body: MocksBody = self.get("admin/mocks/fetch-mocks").await?;
        Ok(body.mocks)
    }

    async fn start_attempt(&self, mock_id: &MockId) -> Result<StartedAttempt, ApiError> {
        self.post("admin/mocks/start-attempt", &StartBody { mock_id })
            .await
    }

    async fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
    ) -> Result<SubmissionResult, ApiError> {
        self.post("admin/mocks/submit-attempt", request).await
    }

    async fn view_answers(&self, mock_id: &MockId) -> Result<AnswerKey, ApiError> {
        self.get(&format!("admin/mocks/view-answers/{mock_id}")).await
    }

    async fn fetch_user_attempts(&self) -> Result<Vec<AttemptSummary>, ApiError> {
        let body: AttemptsBody = self.get("admin/mocks/my-attempts").await?;
        Ok(body.attempts)
    }

    async fn fetch_attempt_details(
        &self,
        attempt_id: &AttemptId,
    ) -> Result<AttemptDetails, ApiError> {
        self.get(&format!("admin/mocks/attempt/{attempt_id}/details"))
            .await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartBody<'a> {
    mock_id: &'a MockId,
}

#[derive(Debug, Deserialize)]
struct MocksBody {
    mocks: Vec<MockSummary>,
}

#[derive(Debug, Deserialize)]
struct AttemptsBody {
    attempts: Vec<AttemptSummary>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
