//! Source images.
//!
//! An [`ImageBuffer`] is the immutable RGBA pixel grid every extraction reads
//! from. It is produced once per loaded file and never mutated afterwards;
//! rescaling produces a new buffer.

use crate::error::ImageError;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Where an image came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMetadata {
    /// File name without directories, if the image was loaded from disk.
    pub file_name: Option<String>,
    /// Dimensions before any downscale or user scale factor was applied.
    pub original_width: u32,
    pub original_height: u32,
}

/// Options applied while decoding an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Downscale so neither side exceeds this many pixels.
    pub max_dimension: Option<u32>,
    /// User scale factor applied after the downscale.
    pub scale: f32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_dimension: Some(800),
            scale: 1.0,
        }
    }
}

impl LoadOptions {
    /// Keep the decoded image exactly as stored.
    pub fn original() -> Self {
        Self {
            max_dimension: None,
            scale: 1.0,
        }
    }

    /// Target size for an image of `width`x`height`, never smaller than 1x1.
    pub fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        let mut factor = 1.0f64;
        if let Some(max) = self.max_dimension {
            let largest = width.max(height);
            if max > 0 && largest > max {
                factor = max as f64 / largest as f64;
            }
        }
        if self.scale.is_finite() && self.scale > 0.0 {
            factor *= self.scale as f64;
        }
        let w = ((width as f64 * factor).round() as u32).max(1);
        let h = ((height as f64 * factor).round() as u32).max(1);
        (w, h)
    }
}

/// Immutable RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    source: SourceMetadata,
}

impl ImageBuffer {
    /// Wrap raw RGBA bytes. `pixels` must hold exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            source: SourceMetadata {
                file_name: None,
                original_width: width,
                original_height: height,
            },
        })
    }

    /// Decode a PNG or JPEG file and apply `options`.
    pub fn open(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| ImageError::Decode {
            path: PathBuf::from(path),
            source,
        })?;

        let (original_width, original_height) = (decoded.width(), decoded.height());
        if original_width == 0 || original_height == 0 {
            return Err(ImageError::Empty {
                width: original_width,
                height: original_height,
            });
        }

        let (width, height) = options.target_size(original_width, original_height);
        let rgba = if (width, height) == (original_width, original_height) {
            decoded.to_rgba8()
        } else {
            log::debug!(
                "resizing {}: {}x{} -> {}x{}",
                path.display(),
                original_width,
                original_height,
                width,
                height
            );
            decoded.resize_exact(width, height, FilterType::Triangle).to_rgba8()
        };

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
            source: SourceMetadata {
                file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
                original_width,
                original_height,
            },
        })
    }

    /// A solid-color image, mostly useful for tests and demos.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, ImageError> {
        let pixels = rgba.repeat(width as usize * height as usize);
        Self::from_rgba(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes in raster order.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    /// RGBA at `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Image center in pixel coordinates.
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        let err = ImageBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            ImageError::SizeMismatch {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn test_from_rgba_rejects_empty() {
        assert!(matches!(
            ImageBuffer::from_rgba(0, 3, vec![]),
            Err(ImageError::Empty { .. })
        ));
    }

    #[test]
    fn test_pixel_bounds() {
        let mut pixels = vec![0u8; 2 * 2 * 4];
        pixels[12..16].copy_from_slice(&[1, 2, 3, 4]);
        let image = ImageBuffer::from_rgba(2, 2, pixels).unwrap();
        assert_eq!(image.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.pixel(0, 2), None);
    }

    #[test]
    fn test_target_size() {
        let opts = LoadOptions {
            max_dimension: Some(100),
            scale: 1.0,
        };
        assert_eq!(opts.target_size(400, 200), (100, 50));
        assert_eq!(opts.target_size(50, 20), (50, 20));

        let scaled = LoadOptions {
            max_dimension: None,
            scale: 0.5,
        };
        assert_eq!(scaled.target_size(10, 3), (5, 2));
        assert_eq!(scaled.target_size(1, 1), (1, 1));
    }

    #[test]
    fn test_open_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 128]).unwrap();
        img.save(&path).unwrap();

        let loaded = ImageBuffer::open(&path, &LoadOptions::original()).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (2, 1));
        assert_eq!(loaded.pixel(1, 0), Some([0, 255, 0, 128]));
        assert_eq!(loaded.source().file_name.as_deref(), Some("tiny.png"));
    }

    #[test]
    fn test_open_missing_file_is_decode_error() {
        let err = ImageBuffer::open("/definitely/not/here.png", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
    }
}
