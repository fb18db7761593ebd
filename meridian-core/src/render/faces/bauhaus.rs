//! Bauhaus face: dot markers, bold hands, a counterweight and a status dot

use core::f32::consts::PI;
use core::fmt::Write;

use heapless::String;

use super::ClockFace;
use crate::render::color::Color;
use crate::render::diff::{hand_capacity, Angle, ClipShape, DiffStats, Hand, HandDiff};
use crate::render::frame::Frame;
use crate::render::{CENTER_X, CENTER_Y, SCREEN_WIDTH};
use crate::state::Phase;
use crate::traits::{LocalTime, Surface, TextStyle, CHAR_HEIGHT, CHAR_WIDTH};

/// Color set of one Bauhaus variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Theme {
    pub background: Color,
    pub face: Color,
    pub hand_hour: Color,
    pub hand_minute: Color,
    pub counterweight: Color,
    pub marker_major: Color,
    pub marker_minor: Color,
    pub status_ok: Color,
    pub status_no_wifi: Color,
    pub status_syncing: Color,
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        background: Color::rgb(255, 255, 255),
        face: Color::rgb(0, 0, 0),
        hand_hour: Color::rgb(0, 0, 0),
        hand_minute: Color::rgb(0, 0, 0),
        counterweight: Color::rgb(210, 30, 30),
        marker_major: Color::rgb(0, 0, 0),
        marker_minor: Color::rgb(0, 0, 0),
        status_ok: Color::rgb(30, 160, 60),
        status_no_wifi: Color::rgb(210, 30, 30),
        status_syncing: Color::rgb(30, 90, 210),
    };

    pub const DARK: Theme = Theme {
        background: Color::rgb(0, 0, 0),
        face: Color::rgb(200, 200, 200),
        hand_hour: Color::rgb(200, 200, 200),
        hand_minute: Color::rgb(200, 200, 200),
        counterweight: Color::rgb(240, 50, 50),
        marker_major: Color::rgb(200, 200, 200),
        marker_minor: Color::rgb(120, 120, 120),
        status_ok: Color::rgb(40, 200, 80),
        status_no_wifi: Color::rgb(240, 50, 50),
        status_syncing: Color::rgb(50, 120, 240),
    };
}

const MARKER_RADIUS: i32 = 108;
const MARKER_MAJOR_SIZE: u32 = 8;
const MARKER_MINOR_SIZE: u32 = 3;
const CENTER_CLIP_RADIUS: i32 = 6;

const HOUR_LENGTH: i32 = 55;
const HOUR_WIDTH: i32 = 6;
const MINUTE_LENGTH: i32 = 95;
const MINUTE_WIDTH: i32 = 4;
const HOUR_PIXELS: usize = hand_capacity(HOUR_LENGTH, HOUR_WIDTH);
const MINUTE_PIXELS: usize = hand_capacity(MINUTE_LENGTH, MINUTE_WIDTH);

const COUNTERWEIGHT_DIST: f32 = 15.0;
const COUNTERWEIGHT_RADIUS: u32 = 5;
const COUNTERWEIGHT_CLIP_R: i32 = 90;

const TIME_SIZE: u8 = 3;
const TIME_TEXT_W: i32 = 5 * CHAR_WIDTH * TIME_SIZE as i32;
const TIME_TEXT_H: i32 = CHAR_HEIGHT * TIME_SIZE as i32;
const TIME_TEXT_PADDING: i32 = 8;
pub const TIME_TEXT_X: i32 = SCREEN_WIDTH - TIME_TEXT_W - TIME_TEXT_PADDING;
pub const TIME_TEXT_Y: i32 = CENTER_Y - TIME_TEXT_H / 2;
const TIME_PLACEHOLDER: &str = "--:--";

/// Status dot replaces the 6 o'clock marker
pub const STATUS_DOT: (i32, i32) = (CENTER_X, CENTER_Y + MARKER_RADIUS);
const STATUS_DOT_RADIUS: u32 = MARKER_MAJOR_SIZE;

const CLIP: [ClipShape; 2] = [
    ClipShape::Disc {
        cx: CENTER_X,
        cy: CENTER_Y,
        r: CENTER_CLIP_RADIUS,
    },
    ClipShape::Rect {
        x: TIME_TEXT_X,
        y: TIME_TEXT_Y,
        w: TIME_TEXT_W,
        h: TIME_TEXT_H,
    },
];

/// Hour hand angle, quantised to the minute
pub fn hour_angle(time: &LocalTime) -> Angle {
    Angle::from_degrees((time.hour % 12) as f32 * 30.0 + time.minute as f32 * 0.5)
}

/// Minute hand angle; jumps once per minute
pub fn minute_angle(time: &LocalTime) -> Angle {
    Angle::from_degrees(time.minute as f32 * 6.0)
}

/// Bauhaus face in one theme
pub struct Bauhaus {
    theme: Theme,
    needs_full_redraw: bool,
    hour: HandDiff<HOUR_PIXELS>,
    minute: HandDiff<MINUTE_PIXELS>,
    status_color: Option<Color>,
    time_text: String<5>,
    counterweight: Option<(i32, i32)>,
}

impl Bauhaus {
    pub const fn new(theme: Theme) -> Self {
        Self {
            theme,
            needs_full_redraw: true,
            hour: HandDiff::new(),
            minute: HandDiff::new(),
            status_color: None,
            time_text: String::new(),
            counterweight: None,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Whether the next draw repaints the whole screen
    pub fn needs_full_redraw(&self) -> bool {
        self.needs_full_redraw
    }

    /// Hour angle currently on screen
    pub fn hour_angle(&self) -> Option<Angle> {
        self.hour.angle()
    }

    /// Status dot color the face should show for `frame`
    pub fn status_color(&self, frame: &Frame<'_>) -> Color {
        match frame.phase {
            Phase::Disconnected | Phase::NotConfigured => self.theme.status_no_wifi,
            _ if frame.phase == Phase::ConnectedSyncing || frame.sync_requested => {
                if frame.blink {
                    self.theme.status_syncing
                } else {
                    self.theme.background
                }
            }
            _ => self.theme.status_ok,
        }
    }

    fn draw_markers<S: Surface + ?Sized>(&self, surface: &mut S) {
        for i in 0..12 {
            // 3 o'clock holds the digital time, 6 o'clock the status dot
            if i == 3 || i == 6 {
                continue;
            }
            let rad = (i * 30 - 90) as f32 * PI / 180.0;
            let x = CENTER_X + libm::roundf(MARKER_RADIUS as f32 * libm::cosf(rad)) as i32;
            let y = CENTER_Y + libm::roundf(MARKER_RADIUS as f32 * libm::sinf(rad)) as i32;
            let (size, color) = if i % 3 == 0 {
                (MARKER_MAJOR_SIZE, self.theme.marker_major)
            } else {
                (MARKER_MINOR_SIZE, self.theme.marker_minor)
            };
            surface.fill_circle(x, y, size, color);
        }
    }

    fn draw_counterweight<S: Surface + ?Sized>(&mut self, surface: &mut S, hour: Angle) {
        if let Some((x, y)) = self.counterweight.take() {
            surface.fill_circle(x, y, COUNTERWEIGHT_RADIUS, self.theme.background);
        }

        let rad = hour.opposite().screen_radians();
        let x = CENTER_X + libm::roundf(COUNTERWEIGHT_DIST * libm::cosf(rad)) as i32;
        let y = CENTER_Y + libm::roundf(COUNTERWEIGHT_DIST * libm::sinf(rad)) as i32;

        let (dx, dy) = (x - CENTER_X, y - CENTER_Y);
        if dx * dx + dy * dy >= COUNTERWEIGHT_CLIP_R * COUNTERWEIGHT_CLIP_R {
            return;
        }

        surface.fill_circle(x, y, COUNTERWEIGHT_RADIUS, self.theme.counterweight);
        surface.draw_circle(x, y, COUNTERWEIGHT_RADIUS, self.theme.face);
        self.counterweight = Some((x, y));
    }

    /// Draw `HH:MM`, or the placeholder without a clock
    fn draw_digital_time<S: Surface + ?Sized>(&mut self, surface: &mut S, time: Option<&LocalTime>) {
        let mut text: String<5> = String::new();
        let _ = match time {
            Some(time) => write!(text, "{:02}:{:02}", time.hour, time.minute),
            None => write!(text, "{}", TIME_PLACEHOLDER),
        };
        if text == self.time_text {
            return;
        }

        surface.fill_rect(
            TIME_TEXT_X,
            TIME_TEXT_Y,
            TIME_TEXT_W as u32,
            TIME_TEXT_H as u32,
            self.theme.background,
        );
        let style = TextStyle::new(TIME_SIZE, self.theme.face, self.theme.background);
        surface.draw_text(TIME_TEXT_X, TIME_TEXT_Y, &text, style);
        self.time_text = text;
    }

    fn draw_status_dot<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) {
        let color = self.status_color(frame);
        if self.status_color != Some(color) {
            surface.fill_circle(STATUS_DOT.0, STATUS_DOT.1, STATUS_DOT_RADIUS, color);
            self.status_color = Some(color);
        }
    }
}

impl ClockFace for Bauhaus {
    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, frame: &Frame<'_>) -> DiffStats {
        if self.needs_full_redraw {
            surface.fill_screen(self.theme.background);
            self.draw_markers(surface);
            self.needs_full_redraw = false;
        }

        let mut stats = DiffStats::default();
        if let Some(time) = frame.time {
            let hour_hand = Hand {
                length: HOUR_LENGTH,
                width: HOUR_WIDTH,
                color: self.theme.hand_hour,
            };
            let minute_hand = Hand {
                length: MINUTE_LENGTH,
                width: MINUTE_WIDTH,
                color: self.theme.hand_minute,
            };

            let hour = hour_angle(&time);
            if self.hour.angle() != Some(hour) {
                stats += self
                    .hour
                    .update(surface, hour, &hour_hand, &CLIP, self.theme.background);
                self.draw_counterweight(surface, hour);
            }
            stats += self.minute.update(
                surface,
                minute_angle(&time),
                &minute_hand,
                &CLIP,
                self.theme.background,
            );
        }
        self.draw_digital_time(surface, frame.time.as_ref());

        self.draw_status_dot(surface, frame);
        stats
    }

    fn reset(&mut self) {
        self.needs_full_redraw = true;
        self.hour.reset();
        self.minute.reset();
        self.status_color = None;
        self.time_text.clear();
        self.counterweight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Op, RecordingSurface};

    fn time(hour: u8, minute: u8) -> LocalTime {
        LocalTime {
            year: 2025,
            month: 3,
            day: 14,
            hour,
            minute,
            second: 0,
            weekday: 4,
            day_of_year: 72,
        }
    }

    fn frame(phase: Phase, blink: bool, time: Option<LocalTime>) -> Frame<'static> {
        Frame {
            phase,
            blink,
            sync_requested: false,
            status: None,
            time,
        }
    }

    #[test]
    fn test_markers_skip_time_and_status_positions() {
        let mut face = Bauhaus::new(Theme::LIGHT);
        let mut surface = RecordingSurface::new();
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, None));

        let markers = surface.count(|op| {
            matches!(op, Op::FillCircle { r, .. } if *r == MARKER_MAJOR_SIZE || *r == MARKER_MINOR_SIZE)
        });
        // 10 markers plus the status dot, which shares the major size
        assert_eq!(markers, 11);
        // Nothing at 3 o'clock
        assert_eq!(
            surface.count(|op| matches!(op, Op::FillCircle { cx, cy, .. } if *cx == 228 && *cy == 120)),
            0
        );
    }

    #[test]
    fn test_status_dot_colors() {
        let face = Bauhaus::new(Theme::DARK);
        let theme = Theme::DARK;

        assert_eq!(
            face.status_color(&frame(Phase::Disconnected, true, None)),
            theme.status_no_wifi
        );
        assert_eq!(
            face.status_color(&frame(Phase::NotConfigured, false, None)),
            theme.status_no_wifi
        );
        assert_eq!(
            face.status_color(&frame(Phase::ConnectedSyncing, true, None)),
            theme.status_syncing
        );
        assert_eq!(
            face.status_color(&frame(Phase::ConnectedSyncing, false, None)),
            theme.background
        );
        assert_eq!(
            face.status_color(&frame(Phase::ConnectedSynced, false, None)),
            theme.status_ok
        );

        let mut requested = frame(Phase::ConnectedSynced, true, None);
        requested.sync_requested = true;
        assert_eq!(face.status_color(&requested), theme.status_syncing);
    }

    #[test]
    fn test_status_dot_redrawn_only_on_change() {
        let mut face = Bauhaus::new(Theme::LIGHT);
        let mut surface = RecordingSurface::new();
        let dot = |op: &Op| matches!(op, Op::FillCircle { cx, cy, .. } if (*cx, *cy) == STATUS_DOT);

        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, None));
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, true, None));
        assert_eq!(surface.count(dot), 1);

        face.draw(&mut surface, &frame(Phase::Disconnected, true, None));
        assert_eq!(surface.count(dot), 2);
    }

    #[test]
    fn test_counterweight_opposite_hour_hand() {
        let mut face = Bauhaus::new(Theme::LIGHT);
        let mut surface = RecordingSurface::new();
        // Hour hand at 12, counterweight straight below the hub
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(0, 0))));

        let weight = Theme::LIGHT.counterweight;
        assert_eq!(
            surface.count(|op| matches!(op, Op::FillCircle { cx: 120, cy: 135, r: 5, color } if *color == weight)),
            1
        );
    }

    #[test]
    fn test_counterweight_moves_with_hour() {
        let mut face = Bauhaus::new(Theme::LIGHT);
        let mut surface = RecordingSurface::new();
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(3, 0))));
        surface.clear_log();

        // Same hour angle: counterweight untouched
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(3, 0))));
        assert_eq!(surface.count(|op| matches!(op, Op::FillCircle { r: 5, .. })), 0);

        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(9, 0))));
        let background = Theme::LIGHT.background;
        // Old one at 9 o'clock side erased, new one drawn at the 3 o'clock side
        assert_eq!(
            surface.count(|op| matches!(op, Op::FillCircle { cx: 105, cy: 120, r: 5, color } if *color == background)),
            1
        );
        assert_eq!(
            surface.count(|op| matches!(op, Op::FillCircle { cx: 135, cy: 120, r: 5, .. })),
            1
        );
    }

    #[test]
    fn test_digital_time_only_on_change() {
        let mut face = Bauhaus::new(Theme::DARK);
        let mut surface = RecordingSurface::new();

        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(14, 5))));
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, true, Some(time(14, 5))));
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(14, 6))));

        assert_eq!(surface.texts(), ["14:05", "14:06"]);
        assert_eq!(surface.fill_screens(), 1);
    }

    #[test]
    fn test_hands_avoid_digital_time() {
        let mut face = Bauhaus::new(Theme::LIGHT);
        let mut surface = RecordingSurface::new();
        // 3:15 puts both hands across the time text
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(3, 15))));

        let inside = surface.count(|op| {
            matches!(op, Op::Pixel { x, y, .. }
                if *x >= TIME_TEXT_X && *x < TIME_TEXT_X + TIME_TEXT_W
                    && *y >= TIME_TEXT_Y && *y < TIME_TEXT_Y + TIME_TEXT_H)
        });
        assert_eq!(inside, 0);
    }

    #[test]
    fn test_placeholder_without_clock() {
        let mut face = Bauhaus::new(Theme::DARK);
        let mut surface = RecordingSurface::new();
        face.draw(&mut surface, &frame(Phase::ConnectedNotSynced, false, None));

        assert_eq!(surface.texts(), ["--:--"]);
        assert!(surface.ops().iter().any(|op| matches!(op,
            Op::Text { x, y, .. } if *x == TIME_TEXT_X && *y == TIME_TEXT_Y)));
    }

    #[test]
    fn test_lost_clock_replaces_time_with_placeholder() {
        let mut face = Bauhaus::new(Theme::LIGHT);
        let mut surface = RecordingSurface::new();
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(11, 42))));
        surface.clear_log();

        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, None));
        assert_eq!(surface.texts(), ["--:--"]);
        let background = Theme::LIGHT.background;
        assert_eq!(
            surface.count(|op| matches!(op, Op::FillRect { x, y, color, .. }
                if *x == TIME_TEXT_X && *y == TIME_TEXT_Y && *color == background)),
            1
        );

        // Still no clock: nothing redrawn
        surface.clear_log();
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, None));
        assert!(surface.texts().is_empty());
    }

    #[test]
    fn test_reset_clears_snapshots() {
        let mut face = Bauhaus::new(Theme::LIGHT);
        let mut surface = RecordingSurface::new();
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(8, 20))));

        face.reset();
        assert!(face.needs_full_redraw());
        assert_eq!(face.hour_angle(), None);

        surface.clear_log();
        face.draw(&mut surface, &frame(Phase::ConnectedSynced, false, Some(time(8, 20))));
        assert_eq!(surface.fill_screens(), 1);
        assert_eq!(surface.texts(), ["08:20"]);
    }
}
