//! Button input

pub mod button;
pub mod coordinator;

pub use button::{Button, ButtonEvent};
pub use coordinator::{ButtonActions, InputCoordinator};
