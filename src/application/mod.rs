//! Application layer (use-cases, policies).
//!
//! This module orchestrates list synchronization on top of the domain types
//! without depending on a UI framework or a concrete HTTP client.

pub mod list;
