//! Full-screen views that are not clock faces
//!
//! The startup screen runs until the first network outcome is known. The
//! overlays take over the panel for phases where a face makes no sense.

use super::color::Color;
use super::icons::{draw_icon, SYNC, SYNC_COLOR, WIFI, WIFI_COLOR};
use super::{CENTER_X, CENTER_Y, SCREEN_WIDTH};
use crate::state::{AppState, Phase};
use crate::traits::{Surface, TextStyle};

const BACKGROUND: Color = Color::BLACK;
const PROMPT_COLOR: Color = Color::YELLOW;
const DETAIL_COLOR: Color = Color::WHITE;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const SPINNER_STYLE: TextStyle = TextStyle::new(3, PROMPT_COLOR, BACKGROUND);
const SPINNER_AT: (i32, i32) = (CENTER_X - 9, 80 - 12);
const STARTUP_WIFI_AT: (i32, i32) = (88, 130);
const STARTUP_SYNC_AT: (i32, i32) = (128, 130);

/// Spinner and connection icons shown while the clock comes up
#[derive(Debug, Default)]
pub struct StartupScreen {
    step: usize,
    blink: bool,
    cleared: bool,
}

impl StartupScreen {
    pub const fn new() -> Self {
        Self {
            step: 0,
            blink: false,
            cleared: false,
        }
    }

    /// Whether the startup screen should give way to the clock face
    pub fn is_finished(state: &AppState) -> bool {
        state.is_initialised() || state.phase().is_settled()
    }

    /// Draw one spinner step for `phase` and advance
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, phase: Phase) {
        if !self.cleared {
            surface.fill_screen(BACKGROUND);
            self.cleared = true;
        }

        surface.draw_text(SPINNER_AT.0, SPINNER_AT.1, SPINNER[self.step], SPINNER_STYLE);

        // (shown, blinking) per icon
        let (wifi, sync) = match phase {
            Phase::Connecting => ((true, true), (false, false)),
            Phase::ConnectedSyncing => ((true, false), (true, true)),
            _ => ((false, false), (false, false)),
        };
        let visible = |(shown, blinking): (bool, bool)| shown && (!blinking || self.blink);

        let (x, y) = STARTUP_WIFI_AT;
        draw_icon(surface, x, y, visible(wifi).then_some((&WIFI, WIFI_COLOR)), BACKGROUND);
        let (x, y) = STARTUP_SYNC_AT;
        draw_icon(surface, x, y, visible(sync).then_some((&SYNC, SYNC_COLOR)), BACKGROUND);

        self.step = (self.step + 1) % SPINNER.len();
        self.blink = !self.blink;
    }
}

/// A screen that replaces the face while a phase lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overlay {
    /// Asks for a double click to erase the configuration
    ResetPrompt,
    /// No WiFi credentials configured
    Setup,
}

impl Overlay {
    pub fn for_phase(phase: Phase) -> Option<Self> {
        match phase {
            Phase::ResetPending => Some(Overlay::ResetPrompt),
            Phase::NotConfigured => Some(Overlay::Setup),
            _ => None,
        }
    }

    /// Paint the overlay over the whole screen
    pub fn draw<S: Surface + ?Sized>(self, surface: &mut S) {
        surface.fill_screen(BACKGROUND);
        match self {
            Overlay::ResetPrompt => {
                let large = TextStyle::new(3, PROMPT_COLOR, BACKGROUND);
                let small = TextStyle::new(2, PROMPT_COLOR, BACKGROUND);
                centered(surface, "Reset", CENTER_Y - 60, large);
                centered(surface, "config?", CENTER_Y - 30, large);
                centered(surface, "Double click", CENTER_Y + 12, small);
                centered(surface, "to confirm", CENTER_Y + 40, small);
            }
            Overlay::Setup => {
                let prompt = TextStyle::new(2, PROMPT_COLOR, BACKGROUND);
                let detail = TextStyle::new(2, DETAIL_COLOR, BACKGROUND);
                centered(surface, "No WiFi", CENTER_Y - 60, prompt);
                centered(surface, "configured", CENTER_Y - 35, prompt);
                centered(surface, "Set [wifi]", CENTER_Y, detail);
                centered(surface, "in clock.toml", CENTER_Y + 25, detail);
            }
        }
    }
}

fn centered<S: Surface + ?Sized>(surface: &mut S, text: &str, y: i32, style: TextStyle) {
    surface.draw_text(style.centered_x(text.len(), SCREEN_WIDTH), y, text, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timing;
    use crate::render::testing::{Op, RecordingSurface};

    #[test]
    fn test_spinner_cycles_and_clears_once() {
        let mut screen = StartupScreen::new();
        let mut surface = RecordingSurface::new();
        for _ in 0..5 {
            screen.draw(&mut surface, Phase::Connecting);
        }
        assert_eq!(surface.fill_screens(), 1);
        assert_eq!(surface.texts(), ["|", "/", "-", "\\", "|"]);
    }

    #[test]
    fn test_wifi_blinks_while_connecting() {
        let mut screen = StartupScreen::new();
        let mut surface = RecordingSurface::new();
        let wifi_drawn = |s: &RecordingSurface| {
            s.count(|op| matches!(op, Op::Bitmap { x: 88, y: 130, .. }))
        };

        screen.draw(&mut surface, Phase::Connecting);
        assert_eq!(wifi_drawn(&surface), 0);
        screen.draw(&mut surface, Phase::Connecting);
        assert_eq!(wifi_drawn(&surface), 1);
    }

    #[test]
    fn test_syncing_shows_solid_wifi_and_blinking_sync() {
        let mut screen = StartupScreen::new();
        let mut surface = RecordingSurface::new();
        screen.draw(&mut surface, Phase::ConnectedSyncing);
        screen.draw(&mut surface, Phase::ConnectedSyncing);

        assert_eq!(surface.count(|op| matches!(op, Op::Bitmap { x: 88, .. })), 2);
        assert_eq!(surface.count(|op| matches!(op, Op::Bitmap { x: 128, .. })), 1);
    }

    #[test]
    fn test_startup_finishes_on_settled_phase_or_init() {
        let state = AppState::new(Timing::DEFAULT);
        assert!(!StartupScreen::is_finished(&state));

        state.set_phase(Phase::Connecting);
        assert!(!StartupScreen::is_finished(&state));
        state.set_phase(Phase::ConnectedSyncing);
        assert!(!StartupScreen::is_finished(&state));
        state.set_phase(Phase::ConnectedNotSynced);
        assert!(StartupScreen::is_finished(&state));

        let state = AppState::new(Timing::DEFAULT);
        state.set_initialised();
        assert!(StartupScreen::is_finished(&state));
    }

    #[test]
    fn test_overlay_for_phase() {
        assert_eq!(Overlay::for_phase(Phase::ResetPending), Some(Overlay::ResetPrompt));
        assert_eq!(Overlay::for_phase(Phase::NotConfigured), Some(Overlay::Setup));
        assert_eq!(Overlay::for_phase(Phase::ConnectedSynced), None);
    }

    #[test]
    fn test_reset_prompt_text() {
        let mut surface = RecordingSurface::new();
        Overlay::ResetPrompt.draw(&mut surface);
        assert_eq!(surface.fill_screens(), 1);
        assert_eq!(surface.texts(), ["Reset", "config?", "Double click", "to confirm"]);
        assert!(surface.ops().iter().any(|op| matches!(op,
            Op::Text { x: 75, y: 60, .. })));
    }
}
