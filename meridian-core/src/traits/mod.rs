//! Collaborator traits
//!
//! These traits define the interface between the clock logic and the
//! hardware/network implementations in the firmware crate.

pub mod clock;
pub mod display;
pub mod network;

pub use clock::{days_in_month, is_leap_year, LocalTime, Monotonic, WallClock};
pub use display::{Bitmap, Surface, TextStyle, CHAR_HEIGHT, CHAR_WIDTH};
pub use network::{LinkControl, LinkStatus, TimeSource};
