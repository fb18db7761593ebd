//! Clock faces
//!
//! A face owns the snapshots of whatever it last put on screen and turns a
//! [`Frame`] into the smallest set of drawing calls that brings the panel up
//! to date. Only the first draw after construction or [`ClockFace::reset`]
//! repaints the whole screen.

mod auto;
mod bauhaus;
mod classic;
mod orbit;

pub use auto::{AutoTheme, BauhausAuto};
pub use bauhaus::{Bauhaus, Theme};
pub use classic::Classic;
pub use orbit::Orbit;

use super::diff::DiffStats;
use super::frame::Frame;
use crate::config::FaceKind;
use crate::traits::Surface;

/// A drawable clock face
pub trait ClockFace {
    /// Bring the screen up to date with `frame`
    ///
    /// Returns the pixel work done by diffed elements.
    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) -> DiffStats;

    /// Forget all snapshots; the next draw repaints everything
    fn reset(&mut self);
}

/// The selectable faces
pub enum Face {
    Classic(Classic),
    Orbit(Orbit),
    Bauhaus(Bauhaus),
    BauhausAuto(BauhausAuto),
}

impl Face {
    pub fn new(kind: FaceKind) -> Self {
        match kind {
            FaceKind::Classic => Face::Classic(Classic::new()),
            FaceKind::Orbit => Face::Orbit(Orbit::new()),
            FaceKind::BauhausLight => Face::Bauhaus(Bauhaus::new(Theme::LIGHT)),
            FaceKind::BauhausDark => Face::Bauhaus(Bauhaus::new(Theme::DARK)),
            FaceKind::BauhausAuto => Face::BauhausAuto(BauhausAuto::new()),
        }
    }

    pub fn kind(&self) -> FaceKind {
        match self {
            Face::Classic(_) => FaceKind::Classic,
            Face::Orbit(_) => FaceKind::Orbit,
            Face::Bauhaus(face) if face.theme() == &Theme::DARK => FaceKind::BauhausDark,
            Face::Bauhaus(_) => FaceKind::BauhausLight,
            Face::BauhausAuto(_) => FaceKind::BauhausAuto,
        }
    }
}

impl ClockFace for Face {
    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) -> DiffStats {
        match self {
            Face::Classic(face) => face.draw(surface, frame),
            Face::Orbit(face) => face.draw(surface, frame),
            Face::Bauhaus(face) => face.draw(surface, frame),
            Face::BauhausAuto(face) => face.draw(surface, frame),
        }
    }

    fn reset(&mut self) {
        match self {
            Face::Classic(face) => face.reset(),
            Face::Orbit(face) => face.reset(),
            Face::Bauhaus(face) => face.reset(),
            Face::BauhausAuto(face) => face.reset(),
        }
    }
}
