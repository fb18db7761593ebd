//! Classic analog face
//!
//! White tick ring, two diffed hands, and a framed text box below the hub
//! that shows the status message or a phase label (the digital time once
//! synced). Connectivity and sync icons sit in the upper corners.

use core::f32::consts::PI;
use core::fmt::Write;

use heapless::String;

use super::ClockFace;
use crate::render::color::Color;
use crate::render::diff::{Angle, ClipShape, DiffStats, Hand, HandDiff};
use crate::render::frame::Frame;
use crate::render::icons::{draw_status_icons, ICON_SIZE};
use crate::render::{CENTER_X, CENTER_Y, SCREEN_WIDTH};
use crate::state::Phase;
use crate::traits::{LocalTime, Surface, TextStyle};

pub const BACKGROUND: Color = Color::BLACK;
pub const CLOCKFACE: Color = Color::WHITE;
pub const MINUTE_HAND_COLOR: Color = Color::rgb(80, 255, 255);
pub const TEXT_COLOR: Color = Color::YELLOW;

const CLOCK_RADIUS: i32 = 120;
const TICK_LENGTH_MAJOR: i32 = 14;
const TICK_LENGTH_MINOR: i32 = 8;
const CENTER_RING: u32 = 8;
const CENTER_DOT: u32 = 5;

const HOUR_HAND: Hand = Hand {
    length: 50,
    width: 5,
    color: CLOCKFACE,
};

const MINUTE_HAND: Hand = Hand {
    length: 93,
    width: 3,
    color: MINUTE_HAND_COLOR,
};

const HOUR_PIXELS: usize = HOUR_HAND.pixel_capacity();
const MINUTE_PIXELS: usize = MINUTE_HAND.pixel_capacity();

pub const TEXTBOX_WIDTH: i32 = 140;
pub const TEXTBOX_HEIGHT: i32 = 35;
pub const TEXTBOX_X: i32 = (SCREEN_WIDTH - TEXTBOX_WIDTH) / 2;
pub const TEXTBOX_Y: i32 = 160;

const TEXT_STYLE: TextStyle = TextStyle::new(2, TEXT_COLOR, BACKGROUND);
/// Glyphs that fit inside the text box frame
pub const TEXT_MAX: usize = ((TEXTBOX_WIDTH - 2) / TEXT_STYLE.text_width(1)) as usize;

const ICON_WIFI: (i32, i32) = (34, 34);
const ICON_SYNC: (i32, i32) = (SCREEN_WIDTH - ICON_WIFI.0 - ICON_SIZE, ICON_WIFI.1);

/// Hub ring and the whole text box including its frame
const CLIP: [ClipShape; 2] = [
    ClipShape::Disc {
        cx: CENTER_X,
        cy: CENTER_Y,
        r: CENTER_RING as i32,
    },
    ClipShape::Rect {
        x: TEXTBOX_X,
        y: TEXTBOX_Y,
        w: TEXTBOX_WIDTH + 1,
        h: TEXTBOX_HEIGHT + 1,
    },
];

/// Hour hand angle, quantised to the minute
pub fn hour_angle(time: &LocalTime) -> Angle {
    Angle::from_degrees((time.hour % 12) as f32 * 30.0 + time.minute as f32 * 0.5)
}

/// Minute hand angle, quantised to the second
pub fn minute_angle(time: &LocalTime) -> Angle {
    Angle::from_degrees(time.minute as f32 * 6.0 + time.second as f32 * 0.1)
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::ConnectedSynced => "--:--:--",
        Phase::ConnectedNotSynced => "No NTP sync",
        Phase::ConnectedSyncing => "Syncing...",
        Phase::Connecting => "Connecting",
        Phase::Disconnected => "No WiFi",
        Phase::NotConfigured | Phase::ResetPending => "",
    }
}

/// Text box content for `frame`
pub fn label(frame: &Frame<'_>) -> String<TEXT_MAX> {
    let mut text = String::new();

    if let Some(status) = frame.status {
        for c in status.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        return text;
    }

    match (frame.phase, frame.time) {
        (Phase::ConnectedSynced, Some(t)) => {
            let _ = write!(text, "{:02}:{:02}:{:02}", t.hour, t.minute, t.second);
        }
        (phase, _) => {
            let _ = text.push_str(phase_label(phase));
        }
    }
    text
}

/// Classic analog face
pub struct Classic {
    needs_full_redraw: bool,
    hour: HandDiff<HOUR_PIXELS>,
    minute: HandDiff<MINUTE_PIXELS>,
    last_text: String<TEXT_MAX>,
}

impl Classic {
    pub const fn new() -> Self {
        Self {
            needs_full_redraw: true,
            hour: HandDiff::new(),
            minute: HandDiff::new(),
            last_text: String::new(),
        }
    }

    /// Hour angle currently on screen
    pub fn hour_angle(&self) -> Option<Angle> {
        self.hour.angle()
    }

    /// Minute angle currently on screen
    pub fn minute_angle(&self) -> Option<Angle> {
        self.minute.angle()
    }

    fn draw_dial<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_screen(BACKGROUND);
        surface.fill_circle(CENTER_X, CENTER_Y, CENTER_RING, BACKGROUND);
        surface.fill_circle(CENTER_X, CENTER_Y, CENTER_DOT, CLOCKFACE);

        for i in 0..12 {
            let rad = (i * 30 - 90) as f32 * PI / 180.0;
            let (cos, sin) = (libm::cosf(rad), libm::sinf(rad));
            let major = i % 3 == 0;
            let len = if major {
                TICK_LENGTH_MAJOR
            } else {
                TICK_LENGTH_MINOR
            };

            let x1 = CENTER_X + (CLOCK_RADIUS as f32 * cos) as i32;
            let y1 = CENTER_Y + (CLOCK_RADIUS as f32 * sin) as i32;
            let x2 = CENTER_X + ((CLOCK_RADIUS - len) as f32 * cos) as i32;
            let y2 = CENTER_Y + ((CLOCK_RADIUS - len) as f32 * sin) as i32;

            surface.draw_line(x1, y1, x2, y2, CLOCKFACE);
            if major {
                surface.draw_line(x1 + 1, y1, x2 + 1, y2, CLOCKFACE);
                surface.draw_line(x1, y1 + 1, x2, y2 + 1, CLOCKFACE);
            }
        }

        surface.draw_rect(
            TEXTBOX_X,
            TEXTBOX_Y,
            TEXTBOX_WIDTH as u32,
            TEXTBOX_HEIGHT as u32,
            CLOCKFACE,
        );
    }

    fn draw_text_box<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) {
        let text = label(frame);
        if text == self.last_text {
            return;
        }

        if text.len() != self.last_text.len() {
            surface.fill_rect(
                TEXTBOX_X + 1,
                TEXTBOX_Y + 1,
                (TEXTBOX_WIDTH - 2) as u32,
                (TEXTBOX_HEIGHT - 2) as u32,
                BACKGROUND,
            );
        }

        if !text.is_empty() {
            let x = TEXT_STYLE.centered_x(text.len(), SCREEN_WIDTH);
            surface.draw_text(x, TEXTBOX_Y + 10, &text, TEXT_STYLE);
        }
        self.last_text = text;
    }
}

impl Default for Classic {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockFace for Classic {
    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) -> DiffStats {
        if self.needs_full_redraw {
            self.draw_dial(surface);
            self.needs_full_redraw = false;
        }

        let mut stats = DiffStats::default();
        if let Some(time) = frame.time {
            stats += self
                .hour
                .update(surface, hour_angle(&time), &HOUR_HAND, &CLIP, BACKGROUND);
            stats += self
                .minute
                .update(surface, minute_angle(&time), &MINUTE_HAND, &CLIP, BACKGROUND);
        }

        draw_status_icons(surface, frame, ICON_WIFI, ICON_SYNC, BACKGROUND);
        self.draw_text_box(surface, frame);
        stats
    }

    fn reset(&mut self) {
        self.needs_full_redraw = true;
        self.hour.reset();
        self.minute.reset();
        self.last_text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Op, RecordingSurface};

    fn time(hour: u8, minute: u8, second: u8) -> LocalTime {
        LocalTime {
            year: 2025,
            month: 6,
            day: 1,
            hour,
            minute,
            second,
            weekday: 6,
            day_of_year: 151,
        }
    }

    fn frame(phase: Phase, time: Option<LocalTime>) -> Frame<'static> {
        Frame {
            phase,
            blink: false,
            sync_requested: false,
            status: None,
            time,
        }
    }

    #[test]
    fn test_hand_angles() {
        let t = time(15, 30, 30);
        assert_eq!(hour_angle(&t).tenths(), 1050);
        assert_eq!(minute_angle(&t).tenths(), 1830);
        assert_eq!(hour_angle(&time(0, 0, 0)).tenths(), 0);
    }

    #[test]
    fn test_labels() {
        let t = Some(time(9, 5, 7));
        assert_eq!(label(&frame(Phase::ConnectedSynced, t)).as_str(), "09:05:07");
        assert_eq!(label(&frame(Phase::ConnectedSynced, None)).as_str(), "--:--:--");
        assert_eq!(label(&frame(Phase::ConnectedNotSynced, t)).as_str(), "No NTP sync");
        assert_eq!(label(&frame(Phase::ConnectedSyncing, t)).as_str(), "Syncing...");
        assert_eq!(label(&frame(Phase::Connecting, t)).as_str(), "Connecting");
        assert_eq!(label(&frame(Phase::Disconnected, t)).as_str(), "No WiFi");
        assert_eq!(label(&frame(Phase::NotConfigured, t)).as_str(), "");

        let mut with_status = frame(Phase::ConnectedSynced, t);
        with_status.status = Some("Time synced");
        assert_eq!(label(&with_status).as_str(), "Time synced");
    }

    #[test]
    fn test_long_status_fits_text_box() {
        assert_eq!(TEXT_MAX, 11);
        let mut f = frame(Phase::ConnectedSynced, None);
        f.status = Some("Connection to time server lost");
        let text = label(&f);
        assert_eq!(text.as_str(), "Connection ");
        assert!(TEXT_STYLE.text_width(text.chars().count()) <= TEXTBOX_WIDTH - 2);

        // Multi-byte glyphs are never split
        f.status = Some("Zeit synchronisiert ✓");
        assert_eq!(label(&f).as_str(), "Zeit synchr");
        f.status = Some("ééééééé");
        assert_eq!(label(&f).chars().count(), 5);
    }

    #[test]
    fn test_first_draw_is_full_then_incremental() {
        let mut face = Classic::new();
        let mut surface = RecordingSurface::new();

        let stats = face.draw(&mut surface, &frame(Phase::ConnectedSynced, Some(time(10, 10, 0))));
        assert_eq!(surface.fill_screens(), 1);
        assert!(stats.drawn > 0);
        assert_eq!(stats.erased, 0);

        surface.clear_log();
        let stats = face.draw(&mut surface, &frame(Phase::ConnectedSynced, Some(time(10, 10, 1))));
        assert_eq!(surface.fill_screens(), 0);
        // Second hand is not drawn, but the minute hand moves 0.1 degrees
        assert!(stats.drawn > 0);
        assert_eq!(surface.texts(), ["10:10:01"]);
    }

    #[test]
    fn test_text_box_cleared_only_on_length_change() {
        let mut face = Classic::new();
        let mut surface = RecordingSurface::new();
        let is_interior_clear =
            |op: &Op| matches!(op, Op::FillRect { x, y, .. } if *x == TEXTBOX_X + 1 && *y == TEXTBOX_Y + 1);

        face.draw(&mut surface, &frame(Phase::ConnectedSynced, Some(time(10, 10, 0))));
        surface.clear_log();

        face.draw(&mut surface, &frame(Phase::ConnectedSynced, Some(time(10, 10, 1))));
        assert_eq!(surface.count(is_interior_clear), 0);

        face.draw(&mut surface, &frame(Phase::Disconnected, Some(time(10, 10, 2))));
        assert_eq!(surface.count(is_interior_clear), 1);
        assert_eq!(surface.texts(), ["10:10:01", "No WiFi"]);

        // Same text again: nothing to draw
        surface.clear_log();
        face.draw(&mut surface, &frame(Phase::Disconnected, Some(time(10, 10, 2))));
        assert!(surface.texts().is_empty());
    }

    #[test]
    fn test_no_clock_skips_hands() {
        let mut face = Classic::new();
        let mut surface = RecordingSurface::new();
        let stats = face.draw(&mut surface, &frame(Phase::ConnectedSynced, None));

        assert_eq!(stats, DiffStats::default());
        assert_eq!(face.hour_angle(), None);
        assert_eq!(surface.texts(), ["--:--:--"]);
    }

    #[test]
    fn test_reset_forces_full_redraw_and_fresh_hands() {
        let mut face = Classic::new();
        let mut surface = RecordingSurface::new();
        let f = frame(Phase::ConnectedSynced, Some(time(3, 0, 0)));

        let first = face.draw(&mut surface, &f);
        face.reset();
        surface.clear_log();

        let again = face.draw(&mut surface, &f);
        assert_eq!(surface.fill_screens(), 1);
        assert_eq!(again.drawn, first.drawn);
        assert_eq!(again.erased, 0);
    }

    #[test]
    fn test_hands_never_touch_text_box() {
        let mut face = Classic::new();
        let mut surface = RecordingSurface::new();
        // 6:30 points both hands straight down through the text box
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, Some(time(6, 30, 0))));
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, Some(time(6, 40, 0))));

        let inside = surface.count(|op| {
            matches!(op, Op::Pixel { x, y, .. }
                if *x >= TEXTBOX_X && *x <= TEXTBOX_X + TEXTBOX_WIDTH
                    && *y >= TEXTBOX_Y && *y <= TEXTBOX_Y + TEXTBOX_HEIGHT)
        });
        assert_eq!(inside, 0);
    }
}
