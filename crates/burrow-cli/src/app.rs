//! Application state management.

use burrow_core::{Config, Finder, ScanBackend};
use burrow_native::NativeBackend;
use std::sync::Arc;
use tracing::debug;

/// Shared application state.
pub struct App {
    /// Configuration
    pub config: Config,

    /// Search entry points over the native backend
    pub finder: Finder,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config) -> Self {
        let backend: Arc<dyn ScanBackend> = Arc::new(NativeBackend::new());

        debug!(backend = backend.name(), "Application initialized");

        App {
            config,
            finder: Finder::new(backend),
        }
    }
}
