//! Board-agnostic core logic for the Meridian round clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Shared application state (phase, status message, sync request)
//! - Button classification and the reset-confirmation flow
//! - Incremental hand/arc diff rendering and the clock faces built on it
//! - Reconnect and time-sync policy
//! - Configuration types and the embedded config parser
//! - Collaborator traits (surface, wall clock, link, time source)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod input;
pub mod network;
pub mod render;
pub mod state;
pub mod traits;
