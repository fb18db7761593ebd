//! Clock configuration
//!
//! Persisted settings, the timing constants every task shares, and the
//! parser for the embedded default configuration.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::{
    ButtonTiming, ClockConfig, FaceKind, Timing, CONFIG_VERSION, DEFAULT_NTP_SERVER,
    DEFAULT_TIMEZONE, MAX_PASSWORD_LEN, MAX_SERVER_LEN, MAX_SSID_LEN, MAX_TIMEZONE_LEN,
};
