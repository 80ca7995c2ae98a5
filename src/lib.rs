//! # Particula - image-to-particle animation
//!
//! Turns a raster image into a field of particles that rest at their
//! source pixels, scatter under the pointer, spring back, and can be
//! exported as a standalone React component that moves the same way.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particula::prelude::*;
//!
//! let image = ImageBuffer::open("logo.png", &LoadOptions::default())?;
//! let config = ParticleConfig::default();
//!
//! // Deterministic: same image and config, same particles.
//! let scene = Scene::extract(&ExtractionInput::new(&image, &config));
//!
//! let mut engine = Engine::new(scene.clone(), config.clone());
//! let mut canvas = PixelCanvas::new(image.width(), image.height());
//! engine.set_pointer(Vec2::new(120.0, 80.0));
//! engine.tick(0.0, &mut canvas);
//! canvas.save_png("frame.png")?;
//!
//! let bundle = generate(Some(&scene), &config, ExportVariant::SingleFile);
//! bundle.write_to_dir("export/")?;
//! ```
//!
//! ## Pipeline
//!
//! ### Extraction
//!
//! [`extract`](extract::extract) scans the image on a grid of
//! `sampling.resolution` pixels, drops transparent samples and deleted
//! regions, resolves colors (original, quantized, or a custom palette),
//! tags each particle with the interaction mask and optional masks,
//! applies manual add and modify edits, and downsamples to
//! `max_particles`. Every random choice goes through a generator seeded by
//! `sampling.seed`.
//!
//! ### Simulation
//!
//! [`Engine::tick`] runs one frame: adaptive skip and the one-shot quality
//! decision, the initial reveal, then per particle:
//!
//! ```text
//! velocity += pointer force     (unmasked, pointer present, interaction allowed)
//! velocity += idle force        (idle enabled, reveal complete)
//! velocity += (origin - position) * return_speed * speed
//! velocity *= friction
//! position += velocity
//! ```
//!
//! then draws through any [`Canvas`], batching one fill per color group.
//!
//! ### Export
//!
//! [`generate`] restates the same frame as TypeScript, baking the
//! configuration into constants and emitting only the enabled paths. The
//! JavaScript for each mode comes from the `to_js` method of the same enum
//! the engine matches on.
//!
//! ## Configuration Enums
//!
//! Closed choices derive [`ConfigEnum`], which provides stable kebab-case
//! keys (shared with JSON and the CLI), labels and index conversions for UI
//! widgets:
//!
//! ```ignore
//! assert_eq!(InteractionMode::Orbit.key(), "orbit");
//! assert_eq!("hue-shift".parse::<VelocityColorMode>(), Ok(VelocityColorMode::HueShift));
//! ```

pub mod canvas;
pub mod codegen;
pub mod color;
pub mod config;
pub mod edits;
pub mod engine;
pub mod error;
pub mod extract;
pub mod forces;
pub mod frame_loop;
pub mod image_buffer;
pub mod input;
pub mod mask;
pub mod noise;
pub mod particle;
pub mod performance;
pub mod quantize;
pub mod render;
pub mod scene;
mod shapes;
pub mod time;

pub use canvas::{Canvas, Path, PixelCanvas, RecordingCanvas, Rgba};
pub use codegen::{generate, ExportBundle, ExportFile, ExportVariant};
pub use color::{ColorFilter, Rgb, VelocityColorMode};
pub use config::{
    IdleMode, InteractionMode, ParticleConfig, ParticleShape, ShootingDirection,
};
pub use edits::{EditKind, EditList, ParticleEdit};
pub use engine::{Engine, FrameStats};
pub use error::{ConfigError, EditError, ExportError, ImageError, MaskError, RenderError};
pub use extract::ExtractionInput;
pub use frame_loop::{CancelHandle, FrameLoop, LoopSummary, StopReason, Timestamps};
pub use glam::Vec2;
pub use image_buffer::{ImageBuffer, LoadOptions};
pub use mask::{MaskBitmap, MaskHistory, OptionalMask};
pub use particle::{Particle, ParticleData};
pub use particula_derive::ConfigEnum;
pub use performance::QualityState;
pub use scene::Scene;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particula::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Canvas, PixelCanvas, RecordingCanvas, Rgba};
    pub use crate::codegen::{generate, ExportBundle, ExportVariant};
    pub use crate::color::{ColorFilter, Rgb, VelocityColorMode};
    pub use crate::config::{IdleMode, InteractionMode, ParticleConfig, ParticleShape, ShootingDirection};
    pub use crate::edits::EditList;
    pub use crate::engine::{Engine, FrameStats};
    pub use crate::extract::ExtractionInput;
    pub use crate::frame_loop::{CancelHandle, FrameLoop, Timestamps};
    pub use crate::image_buffer::{ImageBuffer, LoadOptions};
    pub use crate::mask::{MaskBitmap, OptionalMask};
    pub use crate::scene::Scene;
    pub use crate::Vec2;
    pub use particula_derive::ConfigEnum;
}
