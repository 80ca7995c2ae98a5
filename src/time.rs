//! Frame timing.
//!
//! The engine is driven by caller-supplied timestamps (an animation-frame
//! callback, an egui repaint, or a fixed step in the headless runner), so
//! [`FrameClock`] never reads the system clock itself.
//!
//! # Example
//!
//! ```ignore
//! use particula::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In your frame callback:
//! let frame_ms = clock.tick(now_ms);
//!
//! println!("Frame time: {:.2}ms", frame_ms);
//! println!("Frame: {}", clock.frame());
//! println!("FPS: {:.1}", clock.fps());
//! ```

/// Frame time assumed for the first tick, when there is no previous timestamp.
pub const FIRST_FRAME_MS: f32 = 16.67;

/// How often the FPS estimate is refreshed.
const FPS_UPDATE_INTERVAL_MS: f64 = 500.0;

/// Timestamp-driven frame timing.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the previous tick.
    last: Option<f64>,
    /// Time since the previous tick in milliseconds.
    frame_ms: f32,
    /// Sum of all frame times since the first tick.
    elapsed_ms: f64,
    /// Total ticks.
    frame_count: u64,
    /// FPS estimate (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Elapsed time at last FPS update.
    fps_update_ms: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            frame_ms: 0.0,
            elapsed_ms: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_ms: 0.0,
        }
    }

    /// Advance to `now_ms`. Returns the frame time in milliseconds.
    ///
    /// Timestamps that go backwards yield a zero frame time.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        self.frame_ms = match self.last {
            Some(last) => (now_ms - last).max(0.0) as f32,
            None => FIRST_FRAME_MS,
        };
        self.last = Some(now_ms);
        self.elapsed_ms += self.frame_ms as f64;
        self.frame_count += 1;

        let since = self.elapsed_ms - self.fps_update_ms;
        if since >= FPS_UPDATE_INTERVAL_MS {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = (frames as f64 * 1000.0 / since) as f32;
            self.fps_frame_count = self.frame_count;
            self.fps_update_ms = self.elapsed_ms;
        }

        self.frame_ms
    }

    /// Time since the previous tick in milliseconds.
    #[inline]
    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }

    /// Time since the previous tick in seconds.
    #[inline]
    pub fn frame_seconds(&self) -> f32 {
        self.frame_ms / 1000.0
    }

    /// Sum of frame times since the first tick, in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Number of ticks so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// FPS estimate, refreshed every half second.
    ///
    /// Before the first refresh this is derived from the last frame time.
    #[inline]
    pub fn fps(&self) -> f32 {
        if self.fps > 0.0 {
            self.fps
        } else if self.frame_ms > 0.0 {
            1000.0 / self.frame_ms
        } else {
            0.0
        }
    }

    /// Forget the previous timestamp and all counters.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_assumes_sixty_fps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(12_345.0), FIRST_FRAME_MS);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_frame_time_from_timestamps() {
        let mut clock = FrameClock::new();
        clock.tick(100.0);
        assert_eq!(clock.tick(125.0), 25.0);
        assert!((clock.frame_seconds() - 0.025).abs() < 1e-6);
        assert_eq!(clock.tick(120.0), 0.0);
    }

    #[test]
    fn test_fps_estimate() {
        let mut clock = FrameClock::new();
        let mut now = 0.0;
        for _ in 0..60 {
            clock.tick(now);
            now += 20.0;
        }
        assert!((clock.fps() - 50.0).abs() < 2.0, "fps = {}", clock.fps());
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.tick(40.0);
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.tick(1000.0), FIRST_FRAME_MS);
    }
}
