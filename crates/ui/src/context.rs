use std::sync::Arc;

use tokio::sync::Mutex;

use services::{AttemptController, AttemptHistoryService, ClientConfig, MockCatalogService};

pub trait UiApp: Send + Sync {
    fn config(&self) -> ClientConfig;

    fn catalog(&self) -> Arc<MockCatalogService>;
    fn history(&self) -> Arc<AttemptHistoryService>;
    fn attempts(&self) -> Arc<Mutex<AttemptController>>;
}

#[derive(Clone)]
pub struct AppContext {
    config: Arc<ClientConfig>,

    catalog: Arc<MockCatalogService>,
    history: Arc<AttemptHistoryService>,
    attempts: Arc<Mutex<AttemptController>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            config: Arc::new(app.config()),
            catalog: app.catalog(),
            history: app.history(),
            attempts: app.attempts(),
        }
    }

    #[must_use]
    pub fn config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<MockCatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn history(&self) -> Arc<AttemptHistoryService> {
        Arc::clone(&self.history)
    }

    /// The single attempt controller shared by every view. Hold the lock only
    /// across local work; network calls go through `begin_*` / `complete_*`.
    #[must_use]
    pub fn attempts(&self) -> Arc<Mutex<AttemptController>> {
        Arc::clone(&self.attempts)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
