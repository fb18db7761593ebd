//! The per-tick render step
//!
//! The render task calls [`Renderer::tick`] once per blink interval. A tick
//! resolves the status message, reads the wall clock, then holds the display
//! lock for exactly one face (or overlay) draw.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;

use super::diff::DiffStats;
use super::faces::{ClockFace, Face};
use super::frame::Frame;
use super::screens::Overlay;
use crate::config::FaceKind;
use crate::state::AppState;
use crate::traits::{Surface, WallClock};

pub struct Renderer {
    face: Face,
    overlay: Option<Overlay>,
    blink: bool,
    last_blink_ms: u64,
}

impl Renderer {
    pub fn new(kind: FaceKind) -> Self {
        Self {
            face: Face::new(kind),
            overlay: None,
            blink: false,
            last_blink_ms: 0,
        }
    }

    pub fn face_kind(&self) -> FaceKind {
        self.face.kind()
    }

    /// Switch faces; the new face starts with a full repaint
    pub fn set_face(&mut self, kind: FaceKind) {
        if kind != self.face.kind() {
            self.face = Face::new(kind);
        }
    }

    /// Force a full repaint on the next tick
    pub fn invalidate(&mut self) {
        self.face.reset();
        self.overlay = None;
    }

    pub fn blink(&self) -> bool {
        self.blink
    }

    /// Render one tick into the locked display
    pub async fn tick<M, S, C>(
        &mut self,
        display: &Mutex<M, S>,
        state: &AppState,
        clock: &C,
        now_ms: u64,
    ) -> DiffStats
    where
        M: RawMutex,
        S: Surface,
        C: WallClock,
    {
        if now_ms.saturating_sub(self.last_blink_ms) >= state.timing().blink_interval_ms {
            self.blink = !self.blink;
            self.last_blink_ms = now_ms;
        }

        let status = state.status_message_if_active(now_ms);
        let time = clock.local_time();
        let frame = Frame::capture(state, self.blink, status.as_deref(), time);

        let mut surface = display.lock().await;
        self.render(&mut *surface, &frame)
    }

    /// Draw `frame` with the active face, or the overlay its phase calls for
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) -> DiffStats {
        let overlay = Overlay::for_phase(frame.phase);
        if overlay != self.overlay {
            self.overlay = overlay;
            match overlay {
                Some(overlay) => overlay.draw(surface),
                None => self.face.reset(),
            }
        }

        match self.overlay {
            Some(_) => DiffStats::default(),
            None => self.face.draw(surface, frame),
        }
    }
}
