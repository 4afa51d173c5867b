//! Places a rendered bubble on a cover-fitted background.
//!
//! # Geometry
//! - `padding = max(bubble_w, bubble_h) * PADDING_RATIO`
//! - canvas = bubble + padding on both axes
//! - background is scaled to cover the canvas, preserving aspect ratio, and
//!   centered so the excess is cropped symmetrically
//! - bubble is drawn at native resolution in the exact center
//!
//! `CompositeLayout` holds the exact (fractional) geometry. `composite` turns it
//! into pixels, rounding so the background still covers every canvas pixel.
//!
//! CPU-bound: callers run `composite` and `encode_png` inside `spawn_blocking`.

use std::io::Cursor;

use image::{
    imageops::{self, FilterType},
    DynamicImage, GenericImageView, ImageFormat, ImageResult, Rgba, RgbaImage,
};

/// Canvas margin as a fraction of the larger bubble dimension.
pub const PADDING_RATIO: f64 = 0.2;

/// A rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeLayout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub background: DrawRect,
    pub bubble_x: f64,
    pub bubble_y: f64,
}

impl CompositeLayout {
    pub fn compute(bubble: (u32, u32), background: (u32, u32)) -> Self {
        let (bubble_w, bubble_h) = (bubble.0 as f64, bubble.1 as f64);
        let padding = bubble_w.max(bubble_h) * PADDING_RATIO;
        let canvas_width = bubble_w + padding;
        let canvas_height = bubble_h + padding;

        Self {
            canvas_width,
            canvas_height,
            background: cover_rect(background, canvas_width, canvas_height),
            bubble_x: (canvas_width - bubble_w) / 2.0,
            bubble_y: (canvas_height - bubble_h) / 2.0,
        }
    }

    /// Integer canvas size. Fractional pixels are truncated.
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            (self.canvas_width as u32).max(1),
            (self.canvas_height as u32).max(1),
        )
    }
}

/// Cover-fit: the wider side overflows and is centered, the other side matches exactly.
fn cover_rect(background: (u32, u32), canvas_width: f64, canvas_height: f64) -> DrawRect {
    let (bg_w, bg_h) = (background.0.max(1) as f64, background.1.max(1) as f64);
    let aspect = bg_w / bg_h;
    let canvas_aspect = canvas_width / canvas_height;

    if aspect > canvas_aspect {
        let height = canvas_height;
        let width = height * aspect;
        DrawRect {
            x: -(width - canvas_width) / 2.0,
            y: 0.0,
            width,
            height,
        }
    } else {
        let width = canvas_width;
        let height = width / aspect;
        DrawRect {
            x: 0.0,
            y: -(height - canvas_height) / 2.0,
            width,
            height,
        }
    }
}

/// Builds the final flattened image: cover-fitted background, centered bubble.
/// Returns the layout it was drawn from alongside the pixels.
pub fn composite(bubble: &RgbaImage, background: &DynamicImage) -> (RgbaImage, CompositeLayout) {
    let layout = CompositeLayout::compute(bubble.dimensions(), background.dimensions());
    let (canvas_w, canvas_h) = layout.canvas_size();

    // Round the scaled background up and never below the canvas, then center it
    // using the integer overflow so no edge row or column is left uncovered.
    let draw_w = (layout.background.width.ceil() as u32).max(canvas_w);
    let draw_h = (layout.background.height.ceil() as u32).max(canvas_h);
    let scaled = background
        .resize_exact(draw_w, draw_h, FilterType::Triangle)
        .to_rgba8();
    let offset_x = -(((draw_w - canvas_w) / 2) as i64);
    let offset_y = -(((draw_h - canvas_h) / 2) as i64);

    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([0, 0, 0, 0]));
    imageops::replace(&mut canvas, &scaled, offset_x, offset_y);
    imageops::overlay(
        &mut canvas,
        bubble,
        layout.bubble_x.floor() as i64,
        layout.bubble_y.floor() as i64,
    );

    (canvas, layout)
}

pub fn encode_png(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
