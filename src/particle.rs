//! Particle records.
//!
//! [`ParticleData`] is what extraction produces: a resting position and a
//! color, nothing more. [`Particle`] is the live simulation state built from
//! it when the engine starts.

use crate::color::Rgb;
use crate::config::SizeConfig;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One extracted particle, in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleData {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    /// Inside the interaction mask.
    pub masked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_mask_slugs: Vec<String>,
    /// Explicit size from an add or modify edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

impl ParticleData {
    pub fn new(x: f32, y: f32, color: Rgb) -> Self {
        Self {
            x,
            y,
            color,
            masked: false,
            optional_mask_slugs: Vec::new(),
            size: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Lifecycle of a runtime particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleState {
    /// Waiting for the reveal to reach it. Not integrated, not drawn.
    Pending,
    #[default]
    Active,
}

/// Live simulation state of one particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Resting position from extraction.
    pub origin: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Rgb,
    pub masked: bool,
    pub optional_mask_slugs: Vec<String>,
    /// Rainbow hue accumulator, advanced by this particle's own speed.
    pub hue_offset: f32,
    pub state: ParticleState,
}

impl Particle {
    /// An active particle resting at its origin.
    pub fn at_rest(data: &ParticleData, size: f32) -> Self {
        let origin = data.position();
        Self {
            position: origin,
            origin,
            velocity: Vec2::ZERO,
            size,
            color: data.color,
            masked: data.masked,
            optional_mask_slugs: data.optional_mask_slugs.clone(),
            hue_offset: 0.0,
            state: ParticleState::Active,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == ParticleState::Active
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    #[inline]
    pub fn distance_to_origin(&self) -> f32 {
        self.position.distance(self.origin)
    }

    /// Activate and launch from `from` with `velocity`.
    pub fn launch(&mut self, from: Vec2, velocity: Vec2) {
        self.position = from;
        self.velocity = velocity;
        self.state = ParticleState::Active;
    }
}

/// Seeded size generator so a scene always gets the same sizes.
pub struct SizeSampler {
    rng: SmallRng,
    config: SizeConfig,
}

impl SizeSampler {
    pub fn new(config: &SizeConfig, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            config: config.clone(),
        }
    }

    /// Size for the next particle. Explicit sizes from edits win.
    ///
    /// The RNG advances once per particle either way, so an edit never
    /// shifts the sizes of the particles after it.
    pub fn next_size(&mut self, explicit: Option<f32>) -> f32 {
        let roll: f32 = self.rng.gen();
        if let Some(size) = explicit {
            return size;
        }
        let variation = self.config.size_variation.clamp(0.0, 1.0);
        let size = self.config.particle_size * (1.0 - variation * roll);
        size.max(self.config.min_size)
    }
}

/// Build resting runtime particles from extracted data.
pub fn spawn_particles(data: &[ParticleData], size: &SizeConfig, seed: u64) -> Vec<Particle> {
    let mut sampler = SizeSampler::new(size, seed);
    data.iter()
        .map(|d| Particle::at_rest(d, sampler.next_size(d.size)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(config: &SizeConfig, seed: u64) -> Vec<f32> {
        let data: Vec<_> = (0..20).map(|i| ParticleData::new(i as f32, 0.0, Rgb::WHITE)).collect();
        spawn_particles(&data, config, seed).iter().map(|p| p.size).collect()
    }

    #[test]
    fn test_no_variation_gives_base_size() {
        let config = SizeConfig {
            particle_size: 3.0,
            min_size: 1.0,
            size_variation: 0.0,
        };
        assert!(sizes(&config, 1).iter().all(|&s| s == 3.0));
    }

    #[test]
    fn test_variation_is_seeded_and_bounded() {
        let config = SizeConfig {
            particle_size: 4.0,
            min_size: 1.5,
            size_variation: 1.0,
        };
        let a = sizes(&config, 7);
        assert_eq!(a, sizes(&config, 7));
        assert!(a.iter().all(|&s| (1.5..=4.0).contains(&s)));
        assert!(a.iter().any(|&s| s < 4.0));
    }

    #[test]
    fn test_explicit_size_wins() {
        let mut data = ParticleData::new(0.0, 0.0, Rgb::WHITE);
        data.size = Some(9.0);
        let particles = spawn_particles(&[data], &SizeConfig::default(), 0);
        assert_eq!(particles[0].size, 9.0);
        assert!(particles[0].is_active());
        assert_eq!(particles[0].position, particles[0].origin);
    }
}
