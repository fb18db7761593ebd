//! GC9A01 panel behind the core `Surface` trait
//!
//! Primitives go through embedded-graphics onto the mipidsi driver. Text
//! uses a 5x8 font in 6x8 cells, scaled by painting each font pixel as a
//! `size`-square block.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::interface::SpiInterface;
use mipidsi::models::GC9A01;

use meridian_core::render::{Color, SCREEN_HEIGHT, SCREEN_WIDTH};
use meridian_core::traits::{Bitmap, Surface, TextStyle};

/// The wired-up panel driver
pub type Gc9a01 = mipidsi::Display<
    SpiInterface<
        'static,
        ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, NoDelay>,
        Output<'static>,
    >,
    GC9A01,
    Output<'static>,
>;

/// The display as shared between the startup and render tasks
pub type SharedDisplay = Mutex<CriticalSectionRawMutex, Panel<Gc9a01>>;

/// 5x8 glyphs with one column of spacing, matching the 6x8 text cell
const FONT: MonoFont<'static> = MonoFont {
    character_spacing: 1,
    ..FONT_5X8
};

fn rgb(color: Color) -> Rgb565 {
    Rgb565::from(RawU16::new(color.raw()))
}

/// `Surface` over any RGB565 draw target
pub struct Panel<D> {
    target: D,
    failures: u32,
}

impl<D> Panel<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self {
            target,
            failures: 0,
        }
    }

    fn draw(&mut self, drawable: &impl Drawable<Color = Rgb565>) {
        if drawable.draw(&mut self.target).is_err() {
            self.record_failure();
        }
    }

    fn record_failure(&mut self) {
        self.failures = self.failures.wrapping_add(1);
        // First failure, then every 256th
        if self.failures % 256 == 1 {
            warn!("Display write failed ({} so far)", self.failures);
        }
    }

    fn in_bounds(x: i32, y: i32) -> bool {
        (0..SCREEN_WIDTH).contains(&x) && (0..SCREEN_HEIGHT).contains(&y)
    }
}

impl<D> Surface for Panel<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn fill_screen(&mut self, color: Color) {
        if self.target.clear(rgb(color)).is_err() {
            self.record_failure();
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let area = Rectangle::new(Point::new(x, y), Size::new(w, h));
        if self.target.fill_solid(&area, rgb(color)).is_err() {
            self.record_failure();
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let rect = Rectangle::new(Point::new(x, y), Size::new(w, h))
            .into_styled(PrimitiveStyle::with_stroke(rgb(color), 1));
        self.draw(&rect);
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: u32, color: Color) {
        let circle = Circle::with_center(Point::new(cx, cy), 2 * r + 1)
            .into_styled(PrimitiveStyle::with_fill(rgb(color)));
        self.draw(&circle);
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: u32, color: Color) {
        let circle = Circle::with_center(Point::new(cx, cy), 2 * r + 1)
            .into_styled(PrimitiveStyle::with_stroke(rgb(color), 1));
        self.draw(&circle);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let line = Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(rgb(color), 1));
        self.draw(&line);
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !Self::in_bounds(x, y) {
            return;
        }
        let pixel = Pixel(Point::new(x, y), rgb(color));
        if self.target.draw_iter(core::iter::once(pixel)).is_err() {
            self.record_failure();
        }
    }

    fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color, background: Color) {
        let (fg, bg) = (rgb(color), rgb(background));
        let area = Rectangle::new(
            Point::new(x, y),
            Size::new(u32::from(bitmap.width), u32::from(bitmap.height)),
        );
        // Row-major, matching the area's fill order
        let colors = (0..bitmap.height).flat_map(|row| {
            (0..bitmap.width).map(move |col| if bitmap.is_set(col, row) { fg } else { bg })
        });
        if self.target.fill_contiguous(&area, colors).is_err() {
            self.record_failure();
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, style: TextStyle) {
        let character_style = MonoTextStyleBuilder::new()
            .font(&FONT)
            .text_color(rgb(style.color))
            .background_color(rgb(style.background))
            .build();
        let mut scaled = Scaled {
            inner: &mut self.target,
            origin: Point::new(x, y),
            scale: u32::from(style.size.max(1)),
        };
        if Text::with_baseline(text, Point::zero(), character_style, Baseline::Top)
            .draw(&mut scaled)
            .is_err()
        {
            self.record_failure();
        }
    }
}

/// Draw target that magnifies every pixel into a `scale`-square block
struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D> OriginDimensions for Scaled<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn size(&self) -> Size {
        let size = self.inner.bounding_box().size;
        Size::new(size.width / self.scale, size.height / self.scale)
    }
}

impl<D> DrawTarget for Scaled<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Color = Rgb565;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.inner.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}
