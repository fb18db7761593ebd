//! Configuration loading and persistence
//!
//! Loads the clock configuration from flash or the embedded defaults.

pub mod loader;

pub use loader::{ConfigError, ConfigPersistence};
