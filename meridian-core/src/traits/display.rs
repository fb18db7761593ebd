//! Drawing surface trait for the round TFT
//!
//! The faces only ever talk to a `Surface`: absolute pixel coordinates, one
//! RGB565 color per call. Implementations are expected to be synchronous and
//! fast enough that holding the display lock for a whole face redraw is fine.
//! Out-of-bounds coordinates are the implementation's problem to clip.

use crate::render::color::Color;

/// Base glyph cell width at text size 1
pub const CHAR_WIDTH: i32 = 6;

/// Base glyph cell height at text size 1
pub const CHAR_HEIGHT: i32 = 8;

/// Text rendering parameters
///
/// Glyphs are scaled by an integer `size`, so a cell is `6*size` by
/// `8*size` pixels. The background is painted behind every glyph cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    pub size: u8,
    pub color: Color,
    pub background: Color,
}

impl TextStyle {
    pub const fn new(size: u8, color: Color, background: Color) -> Self {
        Self {
            size,
            color,
            background,
        }
    }

    /// Width in pixels of `len` glyphs
    pub const fn text_width(&self, len: usize) -> i32 {
        len as i32 * CHAR_WIDTH * self.size as i32
    }

    /// Height in pixels of one line
    pub const fn line_height(&self) -> i32 {
        CHAR_HEIGHT * self.size as i32
    }

    /// X that horizontally centers `len` glyphs on a `width`-wide screen
    pub const fn centered_x(&self, len: usize, width: i32) -> i32 {
        (width - self.text_width(len)) / 2
    }
}

/// 1-bit bitmap, one `u32` per row, most significant used bit leftmost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u8,
    pub height: u8,
    pub rows: &'static [u32],
}

impl Bitmap {
    /// Whether the pixel at (`x`, `y`) is set
    pub fn is_set(&self, x: u8, y: u8) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.rows
            .get(y as usize)
            .is_some_and(|row| row & (1 << (self.width - 1 - x)) != 0)
    }
}

/// Primitive drawing operations on the physical display
pub trait Surface {
    /// Paint the entire surface
    fn fill_screen(&mut self, color: Color);

    /// Fill an axis-aligned rectangle
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color);

    /// Outline an axis-aligned rectangle (1px)
    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color);

    /// Fill a circle of radius `r` centered on (`cx`, `cy`)
    fn fill_circle(&mut self, cx: i32, cy: i32, r: u32, color: Color);

    /// Outline a circle of radius `r` centered on (`cx`, `cy`)
    fn draw_circle(&mut self, cx: i32, cy: i32, r: u32, color: Color);

    /// Draw a 1px line between two points, both inclusive
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

    /// Set a single pixel
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Draw a 1-bit bitmap with its top-left corner at (`x`, `y`)
    fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color, background: Color);

    /// Draw ASCII text with its top-left corner at (`x`, `y`)
    fn draw_text(&mut self, x: i32, y: i32, text: &str, style: TextStyle);
}
