//! Pages, cursors and fetch outcomes.

use crate::domain::error::FetchError;
use serde::{Deserialize, Serialize};

/// Pagination position of a list.
///
/// `Unset` means nothing was fetched yet, `Terminal` means the server
/// reported no further pages. `Next` carries an opaque continuation token
/// that is handed back to the fetcher verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Unset,
    Terminal,
    Next(String),
}

impl Cursor {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Cursor::Terminal)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Cursor::Unset)
    }

    /// Continuation token, if more pages can be requested.
    pub fn token(&self) -> Option<&str> {
        match self {
            Cursor::Next(token) => Some(token.as_str()),
            _ => None,
        }
    }
}

impl From<Option<String>> for Cursor {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(token) => Cursor::Next(token),
            None => Cursor::Terminal,
        }
    }
}

/// One page as returned by the backend.
///
/// Wire format: `{"items": [...], "lastValue": "..." | null, "totalCount": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(rename = "lastValue", default)]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, cursor: Option<String>) -> Self {
        Self {
            items,
            cursor,
            total_count: None,
        }
    }

    pub fn with_total(mut self, total_count: u64) -> Self {
        self.total_count = Some(total_count);
        self
    }
}

/// What a fetcher hands back to its store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Page(Page<T>),
    /// The request was superseded; the caller discards it without touching state.
    Stale,
}

pub type FetchResult<T> = Result<FetchOutcome<T>, FetchError>;

/// Reply of a fetch function supplied by the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply<T> {
    Data(T),
    Failed(FetchError),
    Cancelled,
}

impl<T> ApiReply<T> {
    pub fn failed(message: impl Into<String>, code: Option<u16>) -> Self {
        ApiReply::Failed(FetchError::api(message, code))
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, ApiReply::Failed(err) if err.is_processing())
    }
}
