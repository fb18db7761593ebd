//! Button gestures mapped onto application actions
//!
//! A long press arms the configuration reset (`ResetPending`); a double-click
//! while armed confirms it, otherwise it runs the secondary action. An armed
//! reset that is not confirmed in time falls back to the phase it replaced.

use super::button::{Button, ButtonEvent};
use crate::config::ButtonTiming;
use crate::state::{AppState, Phase};

/// What the button does, supplied by the firmware
pub trait ButtonActions {
    /// Reset was confirmed: erase the configuration and restart
    fn confirm_reset(&mut self);

    /// Double-click outside of a pending reset
    fn secondary(&mut self);

    /// Single click
    fn click(&mut self) {}
}

/// Polls the button and applies the reset-confirmation flow
pub struct InputCoordinator {
    button: Button,
    reset_started_ms: Option<u64>,
}

impl InputCoordinator {
    pub const fn new(timing: ButtonTiming) -> Self {
        Self {
            button: Button::new(timing),
            reset_started_ms: None,
        }
    }

    /// Feed one button sample and act on it
    ///
    /// Returns the classified gesture, if any, for logging.
    pub fn poll<A: ButtonActions>(
        &mut self,
        pressed: bool,
        now_ms: u64,
        state: &AppState,
        actions: &mut A,
    ) -> Option<ButtonEvent> {
        let event = self.button.update(pressed, now_ms);

        match event {
            Some(ButtonEvent::LongPressStop) => {
                state.set_phase(Phase::ResetPending);
                self.reset_started_ms = Some(now_ms);
            }
            Some(ButtonEvent::DoubleClick) => {
                if state.phase() == Phase::ResetPending {
                    actions.confirm_reset();
                } else {
                    actions.secondary();
                }
            }
            Some(ButtonEvent::Click) => actions.click(),
            Some(ButtonEvent::LongPressStart) | None => {}
        }

        if state.phase() == Phase::ResetPending {
            let started = *self.reset_started_ms.get_or_insert(now_ms);
            if now_ms.saturating_sub(started) >= state.timing().reset_timeout_ms {
                state.set_phase(state.previous_phase());
                self.reset_started_ms = None;
            }
        } else {
            self.reset_started_ms = None;
        }

        event
    }
}
