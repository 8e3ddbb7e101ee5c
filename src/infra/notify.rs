//! User-facing feedback channels consumed by list stores: the error
//! channel (toast) and the global loading indicator.

use crate::domain::FetchError;
use log::warn;
use std::sync::Arc;

/// Displays a failure to the user.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &FetchError);
}

/// Global blocking loader shown around a non-quiet first load.
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Reporter used when no UI is attached: failures go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn report(&self, error: &FetchError) {
        let payload = serde_json::to_string(error).unwrap_or_else(|_| error.to_string());
        warn!(target: "list", "error: {}", payload);
    }
}

/// Hides the loader when dropped, so every exit path of a load hides it.
pub struct LoadingGuard {
    indicator: Arc<dyn LoadingIndicator>,
}

impl LoadingGuard {
    pub fn show(indicator: Arc<dyn LoadingIndicator>) -> Self {
        indicator.show();
        Self { indicator }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}
