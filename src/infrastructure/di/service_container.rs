//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{GameService, KnowledgeService};
use crate::application::Language;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::FileTreeStore;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Phrasing rules for animals and statements
    pub language: Arc<dyn Language>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let language = settings.language.rules();
        Self::with_deps(settings, Arc::new(RealFileSystem), language)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        language: Arc<dyn Language>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            language,
        }
    }

    pub fn store(&self) -> FileTreeStore {
        FileTreeStore::new(
            Arc::clone(&self.fs),
            &self.settings.data_dir,
            &self.settings.file_stem,
            self.settings.format,
        )
    }

    pub fn game(&self) -> GameService {
        GameService::new(Arc::clone(&self.language))
    }

    pub fn knowledge(&self) -> KnowledgeService {
        KnowledgeService::new(Arc::clone(&self.language))
    }
}
