//! Error types for particula.
//!
//! Only the edges of the library can fail: loading images, masks, configs
//! and edit lists from disk, and writing exported code. The per-frame
//! simulation and the extraction pipeline never return errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a source image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Failed to decode the image file.
    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Raw pixel data does not match the declared dimensions.
    #[error("RGBA data size mismatch: expected {expected} bytes for {width}x{height}, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    /// Image has a zero dimension.
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Errors that can occur while loading or saving a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the file.
    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while loading a mask bitmap.
#[derive(Debug, Error)]
pub enum MaskError {
    /// Failed to decode the mask image.
    #[error("failed to decode mask '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Mask dimensions differ from the image it belongs to.
    #[error("mask is {actual_width}x{actual_height}, image is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Errors that can occur while loading or saving an edit list.
#[derive(Debug, Error)]
pub enum EditError {
    /// Failed to read or write the file.
    #[error("failed to access edit list '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid edit list.
    #[error("invalid edit list JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while writing exported code.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to write: no image was loaded when the bundle was generated.
    #[error("export bundle is empty (no image loaded)")]
    Empty,
    /// Failed to write an output file.
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while writing a rendered frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to encode or write the frame.
    #[error("failed to save frame '{path}': {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
