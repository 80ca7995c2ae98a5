//! Draw call recorder.

use super::{Canvas, Path, Rgba};
use glam::Vec2;

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    FillRect { min: Vec2, size: Vec2, color: Rgba },
    FillPath { path: Path, color: Rgba },
    StrokePath { path: Path, color: Rgba, width: f32 },
}

/// A canvas that draws nothing and remembers every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Forget everything recorded so far.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn fill_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillPath { .. }))
            .count()
    }

    pub fn stroke_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::StrokePath { .. }))
            .count()
    }

    /// Colors of the path fills, in call order.
    pub fn fill_colors(&self) -> Vec<Rgba> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillPath { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.calls.push(DrawCall::FillRect { min, size, color });
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) {
        self.calls.push(DrawCall::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) {
        self.calls.push(DrawCall::StrokePath {
            path: path.clone(),
            color,
            width,
        });
    }
}
