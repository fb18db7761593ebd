//! Rendering: colors, diffed primitives, faces and full-screen overlays
//!
//! Everything here draws through [`Surface`](crate::traits::Surface) and is
//! driven once per render tick by the [`Renderer`].

pub mod color;
pub mod diff;
pub mod faces;
pub mod frame;
pub mod icons;
pub mod renderer;
pub mod screens;

#[cfg(test)]
pub mod testing;

pub use color::Color;
pub use diff::{Angle, ArcDiff, ClipShape, DiffStats, Hand, HandDiff, Pixel, Ring};
pub use faces::{ClockFace, Face};
pub use frame::Frame;
pub use renderer::Renderer;
pub use screens::{Overlay, StartupScreen};

/// Panel width in pixels
pub const SCREEN_WIDTH: i32 = 240;
/// Panel height in pixels
pub const SCREEN_HEIGHT: i32 = 240;
pub const CENTER_X: i32 = SCREEN_WIDTH / 2;
pub const CENTER_Y: i32 = SCREEN_HEIGHT / 2;
