//! Per-tick input to the faces

use crate::state::{AppState, Phase};
use crate::traits::LocalTime;

/// Everything a face may look at for one draw call
///
/// Built fresh every tick from the shared state and the wall clock, so faces
/// never hold on to time or network facts themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub phase: Phase,
    pub blink: bool,
    pub sync_requested: bool,
    /// Active status message, if any
    pub status: Option<&'a str>,
    /// Local time, `None` while the clock is unavailable
    pub time: Option<LocalTime>,
}

impl<'a> Frame<'a> {
    /// Snapshot `state` for this tick
    ///
    /// `status` is the already-resolved active message; reading it is what
    /// expires it, so the caller does that once per tick.
    pub fn capture(
        state: &AppState,
        blink: bool,
        status: Option<&'a str>,
        time: Option<LocalTime>,
    ) -> Self {
        Self {
            phase: state.phase(),
            blink,
            sync_requested: state.is_sync_requested(),
            status,
            time,
        }
    }
}
