use std::sync::Arc;
use std::time::Duration;

use services::{CatalogService, QuizLoopService};

pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<CatalogService>;
    fn session_loop(&self) -> Arc<QuizLoopService>;
    fn feedback_delay(&self) -> Duration;
}

#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<CatalogService>,
    session_loop: Arc<QuizLoopService>,
    feedback_delay: Duration,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            session_loop: app.session_loop(),
            feedback_delay: app.feedback_delay(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        self.feedback_delay
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
