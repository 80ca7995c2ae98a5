//! Sampling, sizing and color-source settings.
//!
//! Everything in [`SamplingConfig`] and [`ColorSourceConfig`] feeds
//! extraction; changing it means the particle list must be rebuilt.

use crate::color::{ColorFilter, Rgb};
use serde::{Deserialize, Serialize};

/// How the image is sampled into particles.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Grid gap in pixels between candidate particles.
    pub resolution: u32,
    /// Pixels with alpha below this are skipped.
    pub alpha_threshold: u8,
    /// Hard cap; larger candidate lists are evenly downsampled.
    pub max_particles: usize,
    /// Snap original colors to a k-means palette.
    pub color_clustering: bool,
    pub cluster_count: usize,
    /// Seed for custom-palette picks and size variation.
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            resolution: 4,
            alpha_threshold: 128,
            max_particles: 15_000,
            color_clustering: false,
            cluster_count: 8,
            seed: 42,
        }
    }
}

impl SamplingConfig {
    /// Effective grid gap, never zero.
    #[inline]
    pub fn gap(&self) -> u32 {
        self.resolution.max(1)
    }
}

/// Particle sizes assigned when the simulation starts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SizeConfig {
    pub particle_size: f32,
    pub min_size: f32,
    /// Fraction in [0, 1] by which sizes randomly shrink below `particle_size`.
    pub size_variation: f32,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            particle_size: 2.0,
            min_size: 1.0,
            size_variation: 0.0,
        }
    }
}

/// Where particle colors come from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorSourceConfig {
    /// Use the image's pixel colors. Otherwise pick from `custom_palette`.
    pub use_original_colors: bool,
    pub custom_palette: Vec<Rgb>,
    pub color_filter: ColorFilter,
}

impl Default for ColorSourceConfig {
    fn default() -> Self {
        Self {
            use_original_colors: true,
            custom_palette: vec![
                Rgb::new(0xff, 0x6b, 0x6b),
                Rgb::new(0x4e, 0xcd, 0xc4),
                Rgb::new(0x45, 0xb7, 0xd1),
                Rgb::new(0xf9, 0xca, 0x24),
            ],
            color_filter: ColorFilter::None,
        }
    }
}
