//! Recording surface for host tests

use std::string::String;
use std::vec::Vec;

use super::color::Color;
use super::diff::Pixel;
use crate::traits::{Bitmap, Surface, TextStyle};

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    FillScreen(Color),
    FillRect { x: i32, y: i32, w: u32, h: u32, color: Color },
    DrawRect { x: i32, y: i32, w: u32, h: u32, color: Color },
    FillCircle { cx: i32, cy: i32, r: u32, color: Color },
    DrawCircle { cx: i32, cy: i32, r: u32, color: Color },
    Line { x0: i32, y0: i32, x1: i32, y1: i32, color: Color },
    Pixel { x: i32, y: i32, color: Color },
    Bitmap { x: i32, y: i32, bitmap: Bitmap, color: Color },
    Text { x: i32, y: i32, text: String, style: TextStyle },
}

/// Surface that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn clear_log(&mut self) {
        self.ops.clear();
    }

    /// Pixels set to `color` via `draw_pixel`, in call order
    pub fn pixels_in(&self, color: Color) -> Vec<Pixel> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Pixel { x, y, color: c } if c == color => {
                    Some(Pixel::new(x as i16, y as i16))
                }
                _ => None,
            })
            .collect()
    }

    /// Texts drawn, in call order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fill_screens(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::FillScreen(_)))
            .count()
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn fill_screen(&mut self, color: Color) {
        self.ops.push(Op::FillScreen(color));
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        self.ops.push(Op::FillRect { x, y, w, h, color });
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        self.ops.push(Op::DrawRect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: u32, color: Color) {
        self.ops.push(Op::FillCircle { cx, cy, r, color });
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: u32, color: Color) {
        self.ops.push(Op::DrawCircle { cx, cy, r, color });
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.ops.push(Op::Line {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.ops.push(Op::Pixel { x, y, color });
    }

    fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color, _background: Color) {
        self.ops.push(Op::Bitmap {
            x,
            y,
            bitmap: *bitmap,
            color,
        });
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, style: TextStyle) {
        self.ops.push(Op::Text {
            x,
            y,
            text: text.into(),
            style,
        });
    }
}
