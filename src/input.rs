//! Pointer input.
//!
//! The pointer is the only input the engine reads. Hosts write it between
//! ticks (mouse move, touch move, leave) and the next tick consumes it.
//!
//! # Usage
//!
//! ```ignore
//! // In your event handler:
//! engine.set_pointer(Vec2::new(x, y));
//!
//! // When the pointer leaves the canvas:
//! engine.clear_pointer();
//! ```

use glam::Vec2;

/// Current pointer state, in image pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    position: Option<Vec2>,
    /// Whether a button or touch is held.
    pressed: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the pointer over the canvas.
    pub fn set(&mut self, position: Vec2) {
        self.position = Some(position);
    }

    /// The pointer left the canvas.
    pub fn clear(&mut self) {
        self.position = None;
        self.pressed = false;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Position while the pointer is over the canvas.
    #[inline]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Whether the pointer is over the canvas.
    #[inline]
    pub fn is_engaged(&self) -> bool {
        self.position.is_some()
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Map a position in a `view`-sized widget to image coordinates.
    pub fn view_to_image(view_pos: Vec2, view_size: Vec2, image_size: Vec2) -> Vec2 {
        if view_size.x <= 0.0 || view_size.y <= 0.0 {
            return view_pos;
        }
        view_pos * image_size / view_size
    }
}
