//! Adaptive performance control.
//!
//! Two independent controllers:
//!
//! - [`SkipController`] throttles how often frames are *rendered*. Physics
//!   still runs every tick.
//! - [`QualityController`] watches the first second of activity and locks
//!   the particle shape once. It never re-evaluates, so shapes cannot
//!   flicker between circle and square under borderline load.

use crate::config::ParticleShape;

/// Frames slower than this count as slow.
pub const SLOW_FRAME_MS: f32 = 20.0;
/// Frames faster than this let the skip level recover.
pub const FAST_FRAME_MS: f32 = 12.0;
pub const MAX_SKIP_LEVEL: u32 = 3;
/// Particle counts above which a baseline skip is forced.
pub const SKIP_THRESHOLDS: [usize; 2] = [10_000, 20_000];

/// Active frames observed before the quality decision.
pub const QUALITY_WINDOW: u32 = 60;
/// Fraction of slow frames that triggers the square lock.
pub const QUALITY_SLOW_RATIO: f32 = 0.3;

/// Adaptive frame skipping.
#[derive(Debug, Clone, Default)]
pub struct SkipController {
    level: u32,
    frame_index: u64,
}

impl SkipController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forced skip for large scenes.
    pub fn baseline(particle_count: usize) -> u32 {
        SKIP_THRESHOLDS.iter().filter(|&&t| particle_count > t).count() as u32
    }

    /// Feed one frame. Returns `(effective_skip, render_this_frame)`.
    pub fn update(&mut self, frame_time_ms: f32, particle_count: usize) -> (u32, bool) {
        if frame_time_ms > SLOW_FRAME_MS {
            self.level = (self.level + 1).min(MAX_SKIP_LEVEL);
        } else if frame_time_ms < FAST_FRAME_MS {
            self.level = self.level.saturating_sub(1);
        }

        let skip = self.level.max(Self::baseline(particle_count));
        let render = self.frame_index % (skip as u64 + 1) == 0;
        self.frame_index += 1;
        (skip, render)
    }

    /// Adaptive level, without the baseline.
    pub fn level(&self) -> u32 {
        self.level
    }
}

/// Render quality decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityState {
    /// Auto performance is off; the configured shape is always used.
    Disabled,
    /// Still watching active frames.
    Observing { observed: u32, slow: u32 },
    /// Decided for the rest of this engine's lifetime.
    Locked(ParticleShape),
}

/// One-shot shape lock.
#[derive(Debug, Clone)]
pub struct QualityController {
    state: QualityState,
}

impl QualityController {
    pub fn new(enabled: bool) -> Self {
        let state = if enabled {
            QualityState::Observing { observed: 0, slow: 0 }
        } else {
            QualityState::Disabled
        };
        Self { state }
    }

    pub fn state(&self) -> QualityState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, QualityState::Locked(_))
    }

    /// Record a frame. Only frames in an active window count.
    ///
    /// Returns the locked shape on the frame the decision is made.
    pub fn observe(&mut self, frame_time_ms: f32, active_window: bool, configured: ParticleShape) -> Option<ParticleShape> {
        let QualityState::Observing { observed, slow } = &mut self.state else {
            return None;
        };
        if !active_window {
            return None;
        }

        *observed += 1;
        if frame_time_ms > SLOW_FRAME_MS {
            *slow += 1;
        }
        if *observed < QUALITY_WINDOW {
            return None;
        }

        let ratio = *slow as f32 / *observed as f32;
        let shape = if ratio > QUALITY_SLOW_RATIO {
            ParticleShape::Square
        } else {
            configured
        };
        log::info!(
            "render quality locked to {} ({}/{} slow frames)",
            shape,
            slow,
            observed
        );
        self.state = QualityState::Locked(shape);
        Some(shape)
    }

    /// Shape to draw with this frame.
    pub fn shape(&self, configured: ParticleShape) -> ParticleShape {
        match self.state {
            QualityState::Locked(shape) => shape,
            _ => configured,
        }
    }
}
