//! Bauhaus face that follows daylight

use super::bauhaus::{Bauhaus, Theme};
use super::ClockFace;
use crate::render::diff::DiffStats;
use crate::render::frame::Frame;
use crate::traits::{LocalTime, Surface};

/// First hour (inclusive) of the light theme
pub const LIGHT_HOUR_START: u8 = 7;
/// First hour of the dark theme
pub const DARK_HOUR_START: u8 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutoTheme {
    Light,
    Dark,
}

impl AutoTheme {
    /// Theme for the given local time; dark while there is no clock
    pub fn for_time(time: Option<&LocalTime>) -> Self {
        match time {
            Some(t) if (LIGHT_HOUR_START..DARK_HOUR_START).contains(&t.hour) => AutoTheme::Light,
            _ => AutoTheme::Dark,
        }
    }
}

/// Light Bauhaus by day, dark Bauhaus by night
///
/// Both delegates keep their own snapshots. Switching resets only the face
/// being switched to.
pub struct BauhausAuto {
    light: Bauhaus,
    dark: Bauhaus,
    active: Option<AutoTheme>,
}

impl BauhausAuto {
    pub const fn new() -> Self {
        Self {
            light: Bauhaus::new(Theme::LIGHT),
            dark: Bauhaus::new(Theme::DARK),
            active: None,
        }
    }

    /// Theme drawn last, `None` before the first draw
    pub fn active(&self) -> Option<AutoTheme> {
        self.active
    }

    pub fn light(&self) -> &Bauhaus {
        &self.light
    }

    pub fn dark(&self) -> &Bauhaus {
        &self.dark
    }

    fn delegate(&mut self, theme: AutoTheme) -> &mut Bauhaus {
        match theme {
            AutoTheme::Light => &mut self.light,
            AutoTheme::Dark => &mut self.dark,
        }
    }
}

impl Default for BauhausAuto {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockFace for BauhausAuto {
    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) -> DiffStats {
        let next = AutoTheme::for_time(frame.time.as_ref());
        if self.active != Some(next) {
            self.active = Some(next);
            self.delegate(next).reset();
        }
        self.delegate(next).draw(surface, frame)
    }

    fn reset(&mut self) {
        match self.active {
            Some(theme) => self.delegate(theme).reset(),
            None => {
                self.light.reset();
                self.dark.reset();
            }
        }
    }
}
