use std::sync::Arc;

use tokio::sync::Mutex;

use storage::LocalAttemptStore;
use storage::repository::Storage;

use crate::Clock;
use crate::api::{ExamApi, HttpExamApi};
use crate::attempt::AttemptController;
use crate::catalog::MockCatalogService;
use crate::config::ClientConfig;
use crate::error::AppServicesError;
use crate::history::AttemptHistoryService;

/// Assembles app-facing services around one exam API and one local store.
#[derive(Clone)]
pub struct AppServices {
    config: ClientConfig,
    catalog: Arc<MockCatalogService>,
    history: Arc<AttemptHistoryService>,
    attempts: Arc<Mutex<AttemptController>>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP exam API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client
    /// setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: ClientConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api: Arc<dyn ExamApi> = Arc::new(HttpExamApi::new(config.clone())?);
        Ok(Self::from_parts(config, api, storage, clock))
    }

    /// Build services over any API and storage; used by tests and previews.
    #[must_use]
    pub fn from_parts(
        config: ClientConfig,
        api: Arc<dyn ExamApi>,
        storage: Storage,
        clock: Clock,
    ) -> Self {
        let store = LocalAttemptStore::new(Arc::clone(&storage.local), clock);
        let attempts = Arc::new(Mutex::new(AttemptController::new(Arc::clone(&api), store)));
        Self {
            config,
            catalog: Arc::new(MockCatalogService::new(Arc::clone(&api))),
            history: Arc::new(AttemptHistoryService::new(api)),
            attempts,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<MockCatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn history(&self) -> Arc<AttemptHistoryService> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn attempts(&self) -> Arc<Mutex<AttemptController>> {
        Arc::clone(&self.attempts)
    }
}
