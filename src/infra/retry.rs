//! Retry policy for endpoints whose data is materialized asynchronously on
//! the backend. While the server answers 423 the same request is repeated.
//! The policy wraps a fetch function; stores never see it.

use crate::domain::ApiReply;
use log::debug;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            delay_ms: 500,
        }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Repeat `request` while it reports "processing", waiting `delay` between
/// attempts. After `max_attempts` the last reply is returned as is.
pub async fn retry_while_processing<T, F, Fut>(policy: RetryPolicy, mut request: F) -> ApiReply<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiReply<T>>,
{
    let mut attempt = 1;
    loop {
        let reply = request().await;
        if !reply.is_processing() || attempt >= policy.max_attempts {
            return reply;
        }
        debug!(target: "retry", "backend still processing, attempt {}", attempt);
        attempt += 1;
        tokio::time::sleep(policy.delay()).await;
    }
}
