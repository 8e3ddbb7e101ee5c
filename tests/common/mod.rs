#![allow(dead_code)]

use listsync::domain::{ApiReply, PROCESSING_STATUS, Page, UserModel};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Offset-paginated user backend. Names are `user001`, `user002`, ...
pub struct UserBackend {
    users: Vec<UserModel>,
    page_size: usize,
    processing_left: AtomicU32,
    pub requests: AtomicUsize,
}

impl UserBackend {
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            users: (1..=total)
                .map(|n| UserModel {
                    id: n.to_string(),
                    name: format!("user{:03}", n),
                    is_following: false,
                })
                .collect(),
            page_size,
            processing_left: AtomicU32::new(0),
            requests: AtomicUsize::new(0),
        }
    }

    /// Answer 423 to the next `count` requests.
    pub fn processing_for(self, count: u32) -> Self {
        self.processing_left.store(count, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn page(&self, query: Option<&str>, cursor: Option<&str>) -> ApiReply<Page<UserModel>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let processing = self
            .processing_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if processing.is_ok() {
            return ApiReply::failed("processing", Some(PROCESSING_STATUS));
        }
        let offset: usize = cursor.map_or(0, |c| c.parse().unwrap());
        let matching: Vec<&UserModel> = self
            .users
            .iter()
            .filter(|user| query.is_none_or(|q| user.name.contains(q)))
            .collect();
        let end = (offset + self.page_size).min(matching.len());
        let items = matching[offset..end].iter().map(|u| (*u).clone()).collect();
        let next = (end < matching.len()).then(|| end.to_string());
        ApiReply::Data(Page::new(items, next).with_total(matching.len() as u64))
    }
}
