//! Mask bitmaps.
//!
//! A mask is an RGBA byte buffer the same size as the source image. Masks
//! are painted with flat black (member) and white (non-member) fills, so
//! only the first byte of each pixel is read: a value below 128 means the
//! pixel is masked. Grayscale or colored masks are not interpreted beyond
//! that first channel.
//!
//! There is one interaction mask per scene (masked particles ignore the
//! pointer and get their own draw layer) and any number of
//! [`OptionalMask`]s, which only tag particles for grouping in exported
//! code.

use crate::color::Rgb;
use crate::error::MaskError;
use glam::Vec2;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// First-channel values below this count as masked.
pub const MASK_THRESHOLD: u8 = 128;

const MASKED: [u8; 4] = [0, 0, 0, 255];
const UNMASKED: [u8; 4] = [255, 255, 255, 255];

/// RGBA mask buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl MaskBitmap {
    /// A blank (fully unmasked) mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: UNMASKED.repeat(width as usize * height as usize),
        }
    }

    /// Wrap raw RGBA bytes without validating their length.
    ///
    /// Reads outside `data` count as unmasked, so a short buffer is safe.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    /// Load a mask image, requiring it to match `width`x`height`.
    pub fn open(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Self, MaskError> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .map_err(|source| MaskError::Decode {
                path: PathBuf::from(path),
                source,
            })?
            .to_rgba8();
        if decoded.width() != width || decoded.height() != height {
            return Err(MaskError::DimensionMismatch {
                width,
                height,
                actual_width: decoded.width(),
                actual_height: decoded.height(),
            });
        }
        Ok(Self::from_rgba(width, height, decoded.into_raw()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the pixel at `(x, y)` is masked. Out of bounds is unmasked.
    #[inline]
    pub fn is_masked(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i).is_some_and(|&v| v < MASK_THRESHOLD)
    }

    /// Number of masked pixels.
    pub fn masked_count(&self) -> usize {
        self.data
            .chunks_exact(4)
            .filter(|px| px[0] < MASK_THRESHOLD)
            .count()
    }

    /// Fill a disc of `radius` around `center` as masked or unmasked.
    pub fn paint(&mut self, center: Vec2, radius: f32, masked: bool) {
        let value = if masked { MASKED } else { UNMASKED };
        let r = radius.max(0.0);
        let x0 = (center.x - r).floor().max(0.0) as u32;
        let y0 = (center.y - r).floor().max(0.0) as u32;
        let x1 = ((center.x + r).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((center.y + r).ceil().max(0.0) as u32).min(self.height);
        let r2 = r * r;

        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.set(x, y, value);
                }
            }
        }
    }

    /// Swap masked and unmasked pixels.
    pub fn invert(&mut self) {
        for px in self.data.chunks_exact_mut(4) {
            let next = if px[0] < MASK_THRESHOLD { UNMASKED } else { MASKED };
            px.copy_from_slice(&next);
        }
    }

    /// Unmask every pixel.
    pub fn clear(&mut self) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&UNMASKED);
        }
    }

    fn set(&mut self, x: u32, y: u32, value: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(px) = self.data.get_mut(i..i + 4) {
            px.copy_from_slice(&value);
        }
    }
}

/// A named mask used to group particles in exported code.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalMask {
    pub id: u32,
    pub slug: String,
    pub name: String,
    /// Overlay color in the editor.
    pub color: Rgb,
    /// `None` until first painted.
    pub data: Option<MaskBitmap>,
}

impl OptionalMask {
    pub fn new(id: u32, name: impl Into<String>, color: Rgb) -> Self {
        let name = name.into();
        let mut slug = slugify(&name);
        if slug.is_empty() {
            slug = format!("mask-{id}");
        }
        Self {
            id,
            slug,
            name,
            color,
            data: None,
        }
    }

    pub fn with_data(mut self, data: MaskBitmap) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether `(x, y)` belongs to this mask. Unpainted masks contain nothing.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.data.as_ref().is_some_and(|m| m.is_masked(x, y))
    }
}

/// Lowercase `name`, collapsing every run of non-alphanumerics into `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Bounded undo/redo history of mask snapshots.
#[derive(Debug, Clone)]
pub struct MaskHistory {
    undo: VecDeque<MaskBitmap>,
    redo: Vec<MaskBitmap>,
    capacity: usize,
}

impl Default for MaskHistory {
    fn default() -> Self {
        Self::new(20)
    }
}

impl MaskHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(capacity),
            redo: Vec::new(),
            capacity,
        }
    }

    /// Record `mask` before a stroke modifies it. Clears the redo stack.
    pub fn record(&mut self, mask: &MaskBitmap) {
        if self.capacity == 0 {
            return;
        }
        if self.undo.len() == self.capacity {
            self.undo.pop_front();
        }
        self.undo.push_back(mask.clone());
        self.redo.clear();
    }

    /// Restore the previous snapshot into `mask`. Returns `false` if there is none.
    pub fn undo(&mut self, mask: &mut MaskBitmap) -> bool {
        match self.undo.pop_back() {
            Some(previous) => {
                self.redo.push(std::mem::replace(mask, previous));
                true
            }
            None => false,
        }
    }

    /// Reapply the last undone snapshot. Returns `false` if there is none.
    pub fn redo(&mut self, mask: &mut MaskBitmap) -> bool {
        match self.redo.pop() {
            Some(next) => {
                self.undo.push_back(std::mem::replace(mask, next));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
