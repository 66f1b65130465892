//! Server state shared by the handlers.

use crate::usecase::ChatRouter;

/// Shared application state
pub struct AppState {
    /// Entry point to the relay core
    pub router: ChatRouter,
}

impl AppState {
    pub fn new(router: ChatRouter) -> Self {
        Self { router }
    }
}
