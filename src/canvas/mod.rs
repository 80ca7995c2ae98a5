//! Drawing surfaces.
//!
//! The engine draws through the [`Canvas`] trait, a small subset of a 2D
//! canvas API: clear, rectangle fill, path fill and path stroke. Two
//! implementations ship with the crate:
//!
//! - [`PixelCanvas`] - software rasterizer with PNG output
//! - [`RecordingCanvas`] - records draw calls for inspection

mod path;
mod raster;
mod recording;

use crate::color::Rgb;
use glam::Vec2;

pub use path::{Path, PathCommand};
pub use raster::PixelCanvas;
pub use recording::{DrawCall, RecordingCanvas};

/// A color with straight (non-premultiplied) alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub const fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub fn new(rgb: Rgb, alpha: f32) -> Self {
        Self {
            rgb,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Self::opaque(rgb)
    }
}

/// A 2D drawing surface.
pub trait Canvas {
    /// Size in pixels.
    fn size(&self) -> (u32, u32);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);

    /// Fill with the non-zero winding rule.
    fn fill_path(&mut self, path: &Path, color: Rgba);

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32);
}
