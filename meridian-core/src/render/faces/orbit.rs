//! Orbit face: concentric progress rings around a digital clock
//!
//! From the outside in the rings show progress through the year, the month,
//! the day and the hour. Inside sit the time, the date, the day name and a
//! seven-segment week bar.

use core::fmt::Write;

use heapless::String;

use super::ClockFace;
use crate::render::color::Color;
use crate::render::diff::{ArcDiff, DiffStats, Ring};
use crate::render::frame::Frame;
use crate::render::icons::{draw_status_icons, ICON_SIZE};
use crate::render::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::state::Phase;
use crate::traits::{LocalTime, Surface, TextStyle};

pub const BACKGROUND: Color = Color::BLACK;
pub const TIME_COLOR: Color = Color::WHITE;
pub const TRACK_COLOR: Color = Color::rgb(50, 50, 50);
pub const DATE_COLOR: Color = Color::rgb(120, 120, 120);
pub const WEEKEND_COLOR: Color = Color::rgb(255, 140, 0);
pub const YEAR_COLOR: Color = Color::rgb(255, 180, 0);
pub const MONTH_COLOR: Color = Color::rgb(50, 220, 120);
pub const DAY_COLOR: Color = Color::rgb(0, 180, 255);
pub const MINUTE_COLOR: Color = Color::rgb(200, 80, 255);

const ARC_THICKNESS: i32 = 3;
const ARC_PADDING: i32 = 2;

const fn ring(outer: i32, color: Color) -> Ring {
    Ring {
        inner: outer - (ARC_THICKNESS - 1),
        outer,
        color,
        track: TRACK_COLOR,
    }
}

const fn next_outer(ring: &Ring) -> i32 {
    ring.inner - ARC_PADDING - 1
}

pub const YEAR_RING: Ring = ring(119, YEAR_COLOR);
pub const MONTH_RING: Ring = ring(next_outer(&YEAR_RING), MONTH_COLOR);
pub const DAY_RING: Ring = ring(next_outer(&MONTH_RING), DAY_COLOR);
pub const MINUTE_RING: Ring = ring(next_outer(&DAY_RING), MINUTE_COLOR);

const TIME_STYLE: TextStyle = TextStyle::new(5, TIME_COLOR, BACKGROUND);
const DATE_STYLE: TextStyle = TextStyle::new(2, DATE_COLOR, BACKGROUND);

pub const TIME_Y: i32 = 72;
pub const DATE_Y: i32 = TIME_Y + TIME_STYLE.line_height() + 12;
pub const DAY_NAME_Y: i32 = DATE_Y + DATE_STYLE.line_height() + 6;
pub const SEG_Y: i32 = DAY_NAME_Y + DATE_STYLE.line_height() + 8;

const SEG_W: i32 = 12;
const SEG_H: i32 = 6;
const SEG_GAP: i32 = 2;
const SEG_COUNT: i32 = 7;
const SEG_TOTAL_W: i32 = SEG_COUNT * SEG_W + (SEG_COUNT - 1) * SEG_GAP;
pub const SEG_START_X: i32 = (SCREEN_WIDTH - SEG_TOTAL_W) / 2;

/// Longest day name, "WEDNESDAY"
const DAY_NAME_MAX: usize = 9;

const ICON_PADDING: i32 = 26;
const ICON_X: i32 = SCREEN_WIDTH / 2 - ICON_SIZE / 2;
const ICON_WIFI: (i32, i32) = (ICON_X, SCREEN_HEIGHT - ICON_SIZE - ICON_PADDING);
const ICON_SYNC: (i32, i32) = (ICON_X, ICON_PADDING);

/// Fill fractions of the four rings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub year: f32,
    pub month: f32,
    pub day: f32,
}

impl Progress {
    pub fn of(time: &LocalTime) -> Self {
        let minutes = time.hour as u32 * 60 + time.minute as u32;
        Self {
            year: (time.day_of_year + 1) as f32 / time.days_in_year() as f32,
            month: time.day as f32 / time.days_in_month() as f32,
            day: (minutes + 1) as f32 / 1440.0,
        }
    }
}

/// Segment color for weekday slot `index` when `active` is today
pub fn segment_color(index: u8, today: u8) -> Color {
    match (index == today, index >= 5) {
        (true, true) => WEEKEND_COLOR,
        (true, false) => MINUTE_COLOR,
        (false, _) => TRACK_COLOR,
    }
}

/// Orbit face
pub struct Orbit {
    needs_full_redraw: bool,
    /// Hour and minute of the most recent valid time
    last_valid: Option<(u8, u8)>,
    /// Minute currently shown; `Some(None)` for the placeholder
    shown_minute: Option<Option<u8>>,
    shown_day: Option<u8>,
    /// Phase, blink and sync request the icons were drawn for
    shown_icons: Option<(Phase, bool, bool)>,
    year: ArcDiff,
    month: ArcDiff,
    day: ArcDiff,
    minute: ArcDiff,
}

impl Orbit {
    pub const fn new() -> Self {
        Self {
            needs_full_redraw: true,
            last_valid: None,
            shown_minute: None,
            shown_day: None,
            shown_icons: None,
            year: ArcDiff::new(),
            month: ArcDiff::new(),
            day: ArcDiff::new(),
            minute: ArcDiff::new(),
        }
    }

    fn draw_arcs<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        time: Option<&LocalTime>,
        minute: Option<u8>,
    ) -> DiffStats {
        let minute_fraction = minute.map_or(0.0, |m| m as f32 / 60.0);
        let mut stats = self.minute.update(surface, &MINUTE_RING, minute_fraction);

        if let Some(time) = time {
            let progress = Progress::of(time);
            stats += self.day.update(surface, &DAY_RING, progress.day);
            stats += self.month.update(surface, &MONTH_RING, progress.month);
            stats += self.year.update(surface, &YEAR_RING, progress.year);
        }
        stats
    }

    fn draw_time<S: Surface + ?Sized>(&self, surface: &mut S) {
        let mut text: String<5> = String::new();
        let _ = match self.last_valid {
            Some((hour, minute)) => write!(text, "{:02}:{:02}", hour, minute),
            None => write!(text, "--:--"),
        };
        let x = TIME_STYLE.centered_x(text.len(), SCREEN_WIDTH);
        surface.draw_text(x, TIME_Y, &text, TIME_STYLE);
    }

    fn draw_date<S: Surface + ?Sized>(&self, surface: &mut S, time: &LocalTime) {
        let mut date: String<10> = String::new();
        let _ = write!(date, "{:04}-{:02}-{:02}", time.year, time.month, time.day);
        let x = DATE_STYLE.centered_x(date.len(), SCREEN_WIDTH);
        surface.draw_text(x, DATE_Y, &date, DATE_STYLE);

        // Day names differ in length; clear the widest one first
        surface.fill_rect(
            DATE_STYLE.centered_x(DAY_NAME_MAX, SCREEN_WIDTH),
            DAY_NAME_Y,
            DATE_STYLE.text_width(DAY_NAME_MAX) as u32,
            DATE_STYLE.line_height() as u32,
            BACKGROUND,
        );
        let name = time.day_name();
        let x = DATE_STYLE.centered_x(name.len(), SCREEN_WIDTH);
        surface.draw_text(x, DAY_NAME_Y, name, DATE_STYLE);

        for i in 0..SEG_COUNT {
            let x = SEG_START_X + i * (SEG_W + SEG_GAP);
            let color = segment_color(i as u8, time.weekday);
            surface.fill_rect(x, SEG_Y, SEG_W as u32, SEG_H as u32, color);
        }
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockFace for Orbit {
    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) -> DiffStats {
        if self.needs_full_redraw {
            surface.fill_screen(BACKGROUND);
            self.needs_full_redraw = false;
        }

        if let Some(t) = frame.time {
            self.last_valid = Some((t.hour, t.minute));
        }
        let minute = self.last_valid.map(|(_, m)| m);

        let mut stats = DiffStats::default();
        if self.shown_minute != Some(minute) {
            stats += self.draw_arcs(surface, frame.time.as_ref(), minute);
            self.draw_time(surface);
            self.shown_minute = Some(minute);
        }

        if let Some(t) = frame.time {
            if self.shown_day != Some(t.day) {
                self.draw_date(surface, &t);
                self.shown_day = Some(t.day);
            }
        }

        let icons = (frame.phase, frame.blink, frame.sync_requested);
        if self.shown_icons != Some(icons) {
            draw_status_icons(surface, frame, ICON_WIFI, ICON_SYNC, BACKGROUND);
            self.shown_icons = Some(icons);
        }

        stats
    }

    fn reset(&mut self) {
        self.needs_full_redraw = true;
        self.shown_minute = None;
        self.shown_day = None;
        self.shown_icons = None;
        self.year.reset();
        self.month.reset();
        self.day.reset();
        self.minute.reset();
    }
}
