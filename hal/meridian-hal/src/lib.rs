//! Meridian hardware abstraction layer
//!
//! Chip-independent traits that the board crates implement. The clock only
//! needs persistent storage from the chip; display, button and radio are
//! driven through `embedded-hal` and the collaborator traits in
//! `meridian-core`.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  meridian-firmware                      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  meridian-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ meridian-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey};
