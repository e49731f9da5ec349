#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod attempt;
pub mod catalog;
pub mod config;
pub mod error;
pub mod history;

pub use exam_core::Clock;

pub use api::{ExamApi, HttpExamApi};
pub use app_services::AppServices;
pub use attempt::{
    AttemptController, AttemptPhase, Countdown, CountdownOutcome, ResumeChoice, ResumeDecision,
    ResumeOffer, StartOutcome,
};
pub use catalog::MockCatalogService;
pub use config::ClientConfig;
pub use error::{ApiError, AppServicesError, AttemptError, ConfigError};
pub use history::AttemptHistoryService;
