//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the one session controller behind an async mutex: handlers take
//! the lock for the whole operation, so session events apply one at a time
//! in arrival order.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::compositor::source::ImageSource;
use crate::controller::SessionController;
use crate::store::FileStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the controller is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<SessionController>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn FileStore>, images: Arc<dyn ImageSource>) -> Self {
        Self { session: Arc::new(Mutex::new(SessionController::new(store, images))) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
