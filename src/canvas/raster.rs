//! Software rasterizer.
//!
//! Scanline polygon fill with the non-zero winding rule, sampled at pixel
//! centers, no anti-aliasing. Good enough for headless frames and tests;
//! the egui editor uses the same surface for its preview texture.

use super::{Canvas, Path, Rgba};
use crate::error::RenderError;
use glam::Vec2;
use std::path::{Path as FsPath, PathBuf};

/// Curve flattening tolerance in pixels.
const TOLERANCE: f32 = 0.5;

/// RGBA8 pixel surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelCanvas {
    /// A transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Raw RGBA bytes in raster order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0).count()
    }

    pub fn to_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
    }

    pub fn save_png(&self, path: impl AsRef<FsPath>) -> Result<(), RenderError> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            self.as_bytes(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|source| RenderError::Save {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Source-over blend of `color` onto pixel `idx`.
    #[inline]
    fn blend(&mut self, idx: usize, color: Rgba) {
        let Some(dst) = self.pixels.get_mut(idx) else {
            return;
        };
        let sa = color.alpha;
        if sa >= 1.0 {
            *dst = [color.rgb.r, color.rgb.g, color.rgb.b, 255];
            return;
        }
        if sa <= 0.0 {
            return;
        }
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| -> u8 {
            let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        *dst = [
            mix(color.rgb.r, dst[0]),
            mix(color.rgb.g, dst[1]),
            mix(color.rgb.b, dst[2]),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ];
    }

    /// Fill closed polygons with the non-zero rule.
    fn fill_polygons(&mut self, polygons: &[Vec<Vec2>], color: Rgba) {
        let (min_y, max_y) = polygons
            .iter()
            .flatten()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }
        let y0 = (min_y - 0.5).ceil().max(0.0) as u32;
        let y1 = ((max_y - 0.5).ceil().max(0.0) as u32).min(self.height);

        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for y in y0..y1 {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for poly in polygons {
                for (i, &a) in poly.iter().enumerate() {
                    let b = poly[(i + 1) % poly.len()];
                    let dir = if a.y <= sy && b.y > sy {
                        1
                    } else if b.y <= sy && a.y > sy {
                        -1
                    } else {
                        continue;
                    };
                    let x = a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y);
                    crossings.push((x, dir));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let start = (pair[0].0 - 0.5).ceil().max(0.0) as u32;
                let end = ((pair[1].0 - 0.5).ceil().max(0.0) as u32).min(self.width);
                let row = y as usize * self.width as usize;
                for x in start..end {
                    self.blend(row + x as usize, color);
                }
            }
        }
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        let x0 = (min.x - 0.5).ceil().max(0.0) as u32;
        let y0 = (min.y - 0.5).ceil().max(0.0) as u32;
        let x1 = ((min.x + size.x - 0.5).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((min.y + size.y - 0.5).ceil().max(0.0) as u32).min(self.height);
        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            for x in x0..x1 {
                self.blend(row + x as usize, color);
            }
        }
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) {
        let polygons = path.flatten(TOLERANCE);
        self.fill_polygons(&polygons, color);
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) {
        let half = width.max(0.0) / 2.0;
        if half == 0.0 {
            return;
        }
        // One quad per segment, all wound the same way so overlaps don't cancel.
        let mut quads = Vec::new();
        for line in path.flatten(TOLERANCE) {
            for seg in line.windows(2) {
                let d = seg[1] - seg[0];
                if d.length_squared() == 0.0 {
                    continue;
                }
                let n = d.perp().normalize() * half;
                quads.push(vec![seg[0] + n, seg[1] + n, seg[1] - n, seg[0] - n]);
            }
        }
        self.fill_polygons(&quads, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_fill_rect_covers_pixels() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.fill_rect(Vec2::new(2.0, 3.0), Vec2::new(4.0, 2.0), Rgba::opaque(Rgb::new(255, 0, 0)));
        assert_eq!(canvas.covered_pixels(), 8);
        assert_eq!(canvas.pixel(2, 3), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(6, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_path_rect_matches_fill_rect() {
        let mut a = PixelCanvas::new(8, 8);
        let mut b = PixelCanvas::new(8, 8);
        let color = Rgba::opaque(Rgb::new(1, 2, 3));
        a.fill_rect(Vec2::new(1.0, 1.0), Vec2::new(3.0, 5.0), color);
        let mut path = Path::new();
        path.rect(Vec2::new(1.0, 1.0), Vec2::new(3.0, 5.0));
        b.fill_path(&path, color);
        assert_eq!(a, b);
    }

    #[test]
    fn test_circle_area() {
        let mut canvas = PixelCanvas::new(40, 40);
        let mut path = Path::new();
        path.move_to(Vec2::new(30.0, 20.0))
            .arc(Vec2::splat(20.0), 10.0, 0.0, std::f32::consts::TAU);
        canvas.fill_path(&path, Rgba::opaque(Rgb::WHITE));
        let area = canvas.covered_pixels() as f32;
        let expected = std::f32::consts::PI * 100.0;
        assert!((area - expected).abs() / expected < 0.05, "area = {area}");
    }

    #[test]
    fn test_translucent_fill_blends_once_per_call() {
        let mut canvas = PixelCanvas::new(4, 4);
        let mut path = Path::new();
        // Two overlapping rects in one path: non-zero fill touches each pixel once.
        path.rect(Vec2::ZERO, Vec2::splat(3.0)).rect(Vec2::ONE, Vec2::splat(3.0));
        canvas.fill_path(&path, Rgba::new(Rgb::WHITE, 0.5));
        assert_eq!(canvas.pixel(1, 1), Some([255, 255, 255, 128]));
    }

    #[test]
    fn test_stroke_draws_line() {
        let mut canvas = PixelCanvas::new(10, 10);
        let mut path = Path::new();
        path.move_to(Vec2::new(0.0, 5.0)).line_to(Vec2::new(10.0, 5.0));
        canvas.stroke_path(&path, Rgba::opaque(Rgb::WHITE), 2.0);
        assert_eq!(canvas.covered_pixels(), 20);
        assert_eq!(canvas.pixel(3, 4), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(3, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = PixelCanvas::new(3, 2);
        canvas.fill_rect(Vec2::ZERO, Vec2::ONE, Rgba::opaque(Rgb::new(9, 8, 7)));
        canvas.save_png(&path).unwrap();
        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.get_pixel(0, 0).0, [9, 8, 7, 255]);
        assert_eq!(back.dimensions(), (3, 2));
    }
}
