use std::path::{Path, PathBuf};
use std::sync::Arc;

use fetchflicks_core::{Config, DownloadService, IntakeService, ProgressTracker, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    downloads: Arc<DownloadService>,
    intake: Arc<IntakeService>,
}

impl AppState {
    pub fn new(config: Config, downloads: Arc<DownloadService>, intake: Arc<IntakeService>) -> Self {
        Self {
            config,
            downloads,
            intake,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn downloads(&self) -> &DownloadService {
        self.downloads.as_ref()
    }

    pub fn intake(&self) -> &IntakeService {
        self.intake.as_ref()
    }

    pub fn progress(&self) -> &Arc<ProgressTracker> {
        self.downloads.progress()
    }

    /// Directory the static HTML pages are served from.
    pub fn pages_dir(&self) -> &Path {
        &self.config.server.pages_dir
    }

    /// Path of a page inside the pages directory.
    pub fn page(&self, name: &str) -> PathBuf {
        self.pages_dir().join(format!("{}.html", name))
    }
}
