//! Infrastructure layer (adapters/implementations).
//!
//! Observer plumbing, the cross-list event bus, user feedback channels,
//! retry policy and on-disk configuration.

pub mod app_config;
pub mod events;
pub mod notify;
pub mod observe;
pub mod retry;
