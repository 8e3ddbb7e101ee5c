use crate::domain::error::FetchError;
use crate::domain::page::Cursor;
use std::sync::Arc;

/// Bound shared by every item a list store can hold.
pub trait ListItem: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> ListItem for T {}

/// Immutable snapshot of a paginated list.
///
/// Stores publish a fresh snapshot on every change. `items` is shared, and
/// its pointer identity changes only when the list itself changed, so
/// observers can skip recomputation on flag-only updates.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Arc<Vec<T>>,
    pub cursor: Cursor,
    pub total_count: Option<u64>,
    pub is_loading: bool,
    pub is_retrying: bool,
    pub is_loading_more: bool,
    pub is_refreshing: bool,
    pub is_first_loading: bool,
    pub is_load_all: bool,
    pub error: Option<FetchError>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            cursor: Cursor::Unset,
            total_count: None,
            is_loading: false,
            is_retrying: false,
            is_loading_more: false,
            is_refreshing: false,
            is_first_loading: true,
            is_load_all: false,
            error: None,
        }
    }
}

impl<T> ListState<T> {
    pub fn is_in_progress(&self) -> bool {
        self.is_loading || self.is_loading_more || self.is_refreshing
    }

    pub(crate) fn reset_progress(&mut self) {
        self.is_loading = false;
        self.is_retrying = false;
        self.is_loading_more = false;
        self.is_refreshing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_first_loading_and_unset() {
        let state = ListState::<u8>::default();
        assert!(state.is_first_loading);
        assert!(state.cursor.is_unset());
        assert!(!state.is_in_progress());
        assert!(!state.is_load_all);
    }

    #[test]
    fn reset_progress_clears_every_flight_flag() {
        let mut state = ListState::<u8> {
            is_loading: true,
            is_retrying: true,
            is_loading_more: true,
            is_refreshing: true,
            ..Default::default()
        };
        state.reset_progress();
        assert!(!state.is_in_progress());
        assert!(!state.is_retrying);
    }
}
