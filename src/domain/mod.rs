//! Domain types for list synchronization.
//! Plain data shared by the stores, fetchers and the event bus.

pub mod error;
pub mod models;
pub mod page;
pub mod state;

pub use error::*;
pub use models::*;
pub use page::*;
pub use state::*;
