//! Service container for dependency injection
//!
//! Wires up settings, filesystem and the tree store.

use std::sync::Arc;

use crate::config::Settings;
use crate::infrastructure::store::TreeStore;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// JSON tree files
    pub store: TreeStore,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let store = TreeStore::new(Arc::clone(&fs));

        Self { settings, fs, store }
    }
}
