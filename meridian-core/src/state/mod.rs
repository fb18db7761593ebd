//! Shared application state
//!
//! The phase model, the transient status message, and the `AppState`
//! container every task reads and writes.

pub mod app;
pub mod phase;
pub mod status;

pub use app::AppState;
pub use phase::Phase;
pub use status::{StatusMessage, StatusText, STATUS_CAPACITY};
