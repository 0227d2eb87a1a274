use super::Provider;
use crate::Result;
use crate::config::Config;
use crate::platform::WindowManager;
use awe_types::Candidate;
use std::sync::Arc;

/// Open windows as reported by the compositor
pub struct WindowProvider {
    windows: Arc<dyn WindowManager>,
}

impl WindowProvider {
    #[must_use]
    pub fn new(windows: Arc<dyn WindowManager>) -> Self {
        Self { windows }
    }
}

impl Provider for WindowProvider {
    fn scan(&self, _config: &Config) -> Result<Vec<Candidate>> {
        self.windows.list_windows()
    }
}
