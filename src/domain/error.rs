//! Domain error types for list synchronization.
//!
//! `FetchError` is the opaque failure a fetch function reports. It is kept
//! inside state snapshots, so it is cheap to clone and comparable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status the backend uses while data is still being materialized.
pub const PROCESSING_STATUS: u16 = 423;

/// Failure reported by a fetch function.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FetchError {
    #[error("{message}")]
    Api { message: String, code: Option<u16> },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("no data")]
    NoData,
}

impl FetchError {
    pub fn api(message: impl Into<String>, code: Option<u16>) -> Self {
        FetchError::Api {
            message: message.into(),
            code,
        }
    }

    /// HTTP status code, when the failure came from the API.
    pub fn code(&self) -> Option<u16> {
        match self {
            FetchError::Api { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.code() == Some(PROCESSING_STATUS)
    }
}

impl From<String> for FetchError {
    fn from(s: String) -> Self {
        FetchError::Api {
            message: s,
            code: None,
        }
    }
}

impl From<&str> for FetchError {
    fn from(s: &str) -> Self {
        FetchError::from(s.to_string())
    }
}

/// Errors raised when a store is wired up incorrectly.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("explore limit must be at least 1, got {0}")]
    InvalidExploreLimit(usize),
}
