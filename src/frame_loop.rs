//! Cancellable frame driver.
//!
//! [`FrameLoop`] ticks an [`Engine`] until it is cancelled, a frame budget
//! runs out, or the per-frame callback breaks. Cancellation goes through a
//! [`CancelHandle`] that can be cloned onto another thread (a signal
//! handler, a UI thread) and is checked before every tick.

use crate::canvas::Canvas;
use crate::engine::{Engine, FrameStats};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancels a running [`FrameLoop`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Where frame timestamps come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamps {
    /// Simulated time advancing by a fixed step; never sleeps.
    Fixed { frame_ms: f64 },
    /// Wall-clock time, sleeping to hold roughly `target_ms` per frame.
    RealTime { target_ms: f64 },
}

/// Why a loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    FrameLimit,
    Callback,
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub rendered: u64,
    pub stopped: StopReason,
}

/// Drives an engine tick by tick.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    timestamps: Timestamps,
    max_frames: Option<u64>,
    cancel: CancelHandle,
}

impl FrameLoop {
    pub fn new(timestamps: Timestamps) -> Self {
        Self {
            timestamps,
            max_frames: None,
            cancel: CancelHandle::new(),
        }
    }

    /// Fixed-step simulated time, e.g. for rendering frames to disk.
    pub fn fixed(frame_ms: f64) -> Self {
        Self::new(Timestamps::Fixed { frame_ms })
    }

    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Share an existing handle instead of the loop's own.
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Tick until cancelled, out of frames, or `on_frame` breaks.
    ///
    /// `on_frame` sees the frame index, its stats, and the canvas after
    /// the tick.
    pub fn run<C, F>(&self, engine: &mut Engine, canvas: &mut C, mut on_frame: F) -> LoopSummary
    where
        C: Canvas + ?Sized,
        F: FnMut(u64, &FrameStats, &C) -> ControlFlow<()>,
    {
        let started = Instant::now();
        let mut frames = 0u64;
        let mut rendered = 0u64;

        let stopped = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if self.max_frames.is_some_and(|max| frames >= max) {
                break StopReason::FrameLimit;
            }

            let now_ms = match self.timestamps {
                Timestamps::Fixed { frame_ms } => frames as f64 * frame_ms,
                Timestamps::RealTime { target_ms } => {
                    let due = Duration::from_secs_f64((frames as f64 * target_ms).max(0.0) / 1000.0);
                    if let Some(wait) = due.checked_sub(started.elapsed()) {
                        std::thread::sleep(wait);
                    }
                    started.elapsed().as_secs_f64() * 1000.0
                }
            };

            let stats = engine.tick(now_ms, canvas);
            let index = frames;
            frames += 1;
            if stats.rendered {
                rendered += 1;
            }
            if on_frame(index, &stats, canvas).is_break() {
                break StopReason::Callback;
            }
        };

        log::debug!("frame loop stopped after {frames} frames ({rendered} rendered): {stopped:?}");
        LoopSummary {
            frames,
            rendered,
            stopped,
        }
    }
}
