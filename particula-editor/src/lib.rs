//! Particula Editor - live preview and headless runner for particle scenes
//!
//! This crate provides:
//! - [`Project`], the editing session (image, masks, edits, config, engine)
//! - Built-in configuration presets
//! - Argument parsers shared by the runner CLI
//! - The egui panels used by the `particula-editor` binary (feature `egui`)

pub mod args;
pub mod presets;
pub mod project;
#[cfg(feature = "egui")]
pub mod ui;

pub use presets::{Preset, PRESETS};
pub use project::{ConfigChange, Project};
