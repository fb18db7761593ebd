//! RP2040 implementation of the Meridian HAL
//!
//! The Pico W only needs one chip-specific service from the clock: the
//! wear-leveled settings store in the tail of its 2MB flash.

#![no_std]

pub mod flash;

pub use flash::Rp2040FlashStorage;
pub use meridian_hal::{FlashError, FlashStorage, StorageKey};
