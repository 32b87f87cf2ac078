use std::sync::Arc;
use std::time::Duration;

use crate::batch::Locator;
use crate::interface::QueryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QueryStore>,
    pub locator: Locator,
    /// Upper bound on one whole batch; `None` waits for every query
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(store: Arc<dyn QueryStore>) -> Self {
        Self {
            store,
            locator: Locator::new(),
            request_timeout: None,
        }
    }

    pub fn locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}
