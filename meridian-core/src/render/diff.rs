//! Incremental hand and arc rendering
//!
//! Repainting a whole 240x240 face over SPI is slow and flickers, so every
//! moving element is diffed at the pixel level instead. A hand is rasterised
//! into a bounded pixel set; on the next angle only the new set is drawn and
//! only the old pixels it no longer covers are erased.
//!
//! Angles are quantised to tenths of a degree and measured clockwise from
//! 12 o'clock. An unchanged quantised angle costs nothing.

use core::f32::consts::PI;
use core::ops::AddAssign;

use heapless::Vec;

use super::color::Color;
use super::{CENTER_X, CENTER_Y};
use crate::traits::Surface;

/// Screen coordinate of one rasterised pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pixel {
    pub x: i16,
    pub y: i16,
}

impl Pixel {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Angle quantised to tenths of a degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Angle(i32);

impl Angle {
    /// Round `degrees` to the nearest tenth
    pub fn from_degrees(degrees: f32) -> Self {
        Angle(libm::floorf(degrees * 10.0 + 0.5) as i32)
    }

    pub const fn from_tenths(tenths: i32) -> Self {
        Angle(tenths)
    }

    pub const fn tenths(self) -> i32 {
        self.0
    }

    pub fn degrees(self) -> f32 {
        self.0 as f32 / 10.0
    }

    /// Screen-space radians (0 = 3 o'clock, y grows downward)
    pub fn screen_radians(self) -> f32 {
        (self.degrees() - 90.0) * PI / 180.0
    }

    /// The angle pointing the opposite way
    pub fn opposite(self) -> Self {
        Angle((self.0 + 1800).rem_euclid(3600))
    }
}

/// Region that a diffed element never draws into or erases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClipShape {
    /// Disc of radius `r`, boundary included
    Disc { cx: i32, cy: i32, r: i32 },
    /// Half-open rectangle `[x, x + w) x [y, y + h)`
    Rect { x: i32, y: i32, w: i32, h: i32 },
}

impl ClipShape {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        match *self {
            ClipShape::Disc { cx, cy, r } => {
                let dx = x - cx;
                let dy = y - cy;
                dx * dx + dy * dy <= r * r
            }
            ClipShape::Rect { x: rx, y: ry, w, h } => {
                x >= rx && x < rx + w && y >= ry && y < ry + h
            }
        }
    }
}

/// Whether any shape of `clip` covers (`x`, `y`)
pub fn is_clipped(clip: &[ClipShape], x: i32, y: i32) -> bool {
    clip.iter().any(|shape| shape.contains(x, y))
}

/// Static description of a clock hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hand {
    pub length: i32,
    pub width: i32,
    pub color: Color,
}

impl Hand {
    /// Snapshot capacity that holds every pixel of this hand at any angle
    pub const fn pixel_capacity(&self) -> usize {
        hand_capacity(self.length, self.width)
    }
}

/// Upper bound on the pixels [`collect_hand_pixels`] yields for a hand
///
/// Each strand is a Bresenham line of at most `length + 1` pixels, and there
/// are `2 * (width / 2) + 1` strands.
pub const fn hand_capacity(length: i32, width: i32) -> usize {
    ((2 * (width / 2) + 1) * (length + 1)) as usize
}

/// Work done by one diff update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiffStats {
    /// Pixels painted in the element color
    pub drawn: usize,
    /// Pixels painted back to background/track
    pub erased: usize,
    /// Pixels that did not fit the snapshot buffer
    pub dropped: usize,
}

impl DiffStats {
    /// No pixel was touched
    pub fn is_idle(&self) -> bool {
        self.drawn == 0 && self.erased == 0
    }
}

impl AddAssign for DiffStats {
    fn add_assign(&mut self, rhs: Self) {
        self.drawn += rhs.drawn;
        self.erased += rhs.erased;
        self.dropped += rhs.dropped;
    }
}

/// Rasterise a hand into `out`
///
/// Each of the `width` strands is a Bresenham line from the face center to
/// the tip, offset perpendicular to the hand. Clipped pixels are skipped.
/// Pixels past `out`'s capacity are counted and discarded; the count is
/// returned.
pub fn collect_hand_pixels<const N: usize>(
    angle: Angle,
    length: i32,
    width: i32,
    clip: &[ClipShape],
    out: &mut Vec<Pixel, N>,
) -> usize {
    let rad = angle.screen_radians();
    let perp = rad + PI / 2.0;

    let ex = CENTER_X + (length as f32 * libm::cosf(rad)) as i32;
    let ey = CENTER_Y + (length as f32 * libm::sinf(rad)) as i32;

    let mut dropped = 0;
    let half = width / 2;
    for i in -half..=half {
        let ox = libm::roundf(i as f32 * libm::cosf(perp)) as i32;
        let oy = libm::roundf(i as f32 * libm::sinf(perp)) as i32;

        let (mut x0, mut y0) = (CENTER_X + ox, CENTER_Y + oy);
        let (x1, y1) = (ex + ox, ey + oy);

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if !is_clipped(clip, x0, y0) && out.push(Pixel::new(x0 as i16, y0 as i16)).is_err() {
                dropped += 1;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    dropped
}

/// Snapshot of one hand as it is currently on screen
pub struct HandDiff<const N: usize> {
    angle: Option<Angle>,
    pixels: Vec<Pixel, N>,
}

impl<const N: usize> HandDiff<N> {
    pub const fn new() -> Self {
        Self {
            angle: None,
            pixels: Vec::new(),
        }
    }

    /// Forget what is on screen; the next update draws from scratch
    pub fn reset(&mut self) {
        self.angle = None;
        self.pixels.clear();
    }

    /// Angle currently drawn, if any
    pub fn angle(&self) -> Option<Angle> {
        self.angle
    }

    /// Pixels currently drawn
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Move the hand to `angle`
    ///
    /// Draws the full new pixel set, then erases every previously drawn pixel
    /// the new set does not cover. A repeated angle is a no-op.
    pub fn update<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        angle: Angle,
        hand: &Hand,
        clip: &[ClipShape],
        background: Color,
    ) -> DiffStats {
        if self.angle == Some(angle) {
            return DiffStats::default();
        }

        let mut next: Vec<Pixel, N> = Vec::new();
        let dropped = collect_hand_pixels(angle, hand.length, hand.width, clip, &mut next);

        for p in &next {
            surface.draw_pixel(p.x.into(), p.y.into(), hand.color);
        }

        let mut erased = 0;
        for p in self.pixels.iter().filter(|p| !next.contains(p)) {
            surface.draw_pixel(p.x.into(), p.y.into(), background);
            erased += 1;
        }

        let drawn = next.len();
        self.pixels = next;
        self.angle = Some(angle);

        DiffStats {
            drawn,
            erased,
            dropped,
        }
    }
}

impl<const N: usize> Default for HandDiff<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Angular resolution of progress arcs in tenths of a degree
pub const ARC_STEP_TENTHS: u16 = 3;

/// Number of angular steps around a full arc
pub const ARC_STEPS: u16 = 3600 / ARC_STEP_TENTHS;

/// A progress ring, `inner..=outer` pixels from the face center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ring {
    pub inner: i32,
    pub outer: i32,
    pub color: Color,
    pub track: Color,
}

/// Number of arc steps whose start angle lies below `fraction` of a turn
pub fn filled_steps(fraction: f32) -> u16 {
    let limit = fraction.clamp(0.0, 1.0) * 3600.0;
    let steps = libm::ceilf(limit / ARC_STEP_TENTHS as f32) as u16;
    steps.min(ARC_STEPS)
}

/// Snapshot of one progress ring as it is currently on screen
///
/// The per-step "pixel set" of a ring is just filled or track color, so only
/// the steps between the old and new fill boundary are repainted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArcDiff {
    filled: Option<u16>,
}

impl ArcDiff {
    pub const fn new() -> Self {
        Self { filled: None }
    }

    pub fn reset(&mut self) {
        self.filled = None;
    }

    /// Steps currently shown filled
    pub fn filled(&self) -> Option<u16> {
        self.filled
    }

    /// Show `fraction` (0.0..=1.0) of the ring filled
    pub fn update<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        ring: &Ring,
        fraction: f32,
    ) -> DiffStats {
        let filled = filled_steps(fraction);
        let range = match self.filled {
            Some(prev) if prev == filled => return DiffStats::default(),
            Some(prev) => prev.min(filled)..prev.max(filled),
            None => 0..ARC_STEPS,
        };

        let mut stats = DiffStats::default();
        for step in range {
            let angle = Angle::from_tenths((step * ARC_STEP_TENTHS) as i32);
            let rad = angle.screen_radians();
            let (cos, sin) = (libm::cosf(rad), libm::sinf(rad));
            let is_filled = step < filled;
            let color = if is_filled { ring.color } else { ring.track };

            for r in ring.inner..=ring.outer {
                let x = CENTER_X + libm::roundf(r as f32 * cos) as i32;
                let y = CENTER_Y + libm::roundf(r as f32 * sin) as i32;
                surface.draw_pixel(x, y, color);
                if is_filled {
                    stats.drawn += 1;
                } else {
                    stats.erased += 1;
                }
            }
        }

        self.filled = Some(filled);
        stats
    }
}
