//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{OptionId, QuestionId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the exam API boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not signed in or session expired")]
    Unauthorized,
    #[error("request failed with status {status}: {}", message.as_deref().unwrap_or("no details"))]
    Status {
        status: reqwest::StatusCode,
        message: Option<String>,
    },
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the attempt lifecycle controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("another start or submit request is still pending")]
    Busy,
    #[error("an attempt is already in progress")]
    AlreadyActive,
    #[error("no attempt is in progress")]
    NotActive,
    #[error("time is up; answers can no longer be changed")]
    TimeUp,
    #[error("no saved attempt to resume")]
    NothingToResume,
    #[error("question {0} is not part of this attempt")]
    UnknownQuestion(QuestionId),
    #[error("option {option} does not belong to question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while reading client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{name} must use http or https, got {scheme}")]
    UnsupportedScheme { name: &'static str, scheme: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
