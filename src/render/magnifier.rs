//! Magnifier lens geometry for the detail image
//!
//! Given the pointer position over the displayed image, computes where a
//! square lens sits and which zoomed crop it shows. Both are clamped so the
//! lens stays over the image and the crop never samples outside it.

use crate::config::MagnifierConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Lens placement and background for one pointer position.
/// All values are CSS pixels relative to the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lens {
    pub left: f64,
    pub top: f64,
    pub size: f64,
    pub background_width: f64,
    pub background_height: f64,
    pub background_x: f64,
    pub background_y: f64,
    /// Crop origin in unzoomed image pixels
    pub crop_x: f64,
    pub crop_y: f64,
    /// Crop edge length in unzoomed image pixels
    pub crop_size: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Magnifier {
    config: MagnifierConfig,
}

impl Magnifier {
    pub fn new(config: MagnifierConfig) -> Self {
        Self { config }
    }

    /// `None` when the pointer is off the image or the image has no area
    pub fn lens(&self, pointer: Point, image: Size) -> Option<Lens> {
        let (w, h) = (image.width, image.height);
        if !(w > 0.0 && h > 0.0) {
            return None;
        }
        if pointer.x < 0.0 || pointer.y < 0.0 || pointer.x > w || pointer.y > h {
            return None;
        }

        let zoom = self.config.zoom.max(1.0);
        let short_side = w.min(h);
        let size = clamp(
            short_side * self.config.lens_ratio,
            self.config.min_lens_px,
            self.config.max_lens_px,
        )
        .min(short_side);

        let crop_size = size / zoom;
        let crop_x = clamp(pointer.x - crop_size / 2.0, 0.0, w - crop_size);
        let crop_y = clamp(pointer.y - crop_size / 2.0, 0.0, h - crop_size);

        Some(Lens {
            left: clamp(pointer.x - size / 2.0, 0.0, w - size),
            top: clamp(pointer.y - size / 2.0, 0.0, h - size),
            size,
            background_width: w * zoom,
            background_height: h * zoom,
            background_x: -crop_x * zoom,
            background_y: -crop_y * zoom,
            crop_x,
            crop_y,
            crop_size,
        })
    }
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi.max(lo))
}
