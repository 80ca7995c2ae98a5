//! Extracted scenes.

use crate::extract::{extract, ExtractionInput};
use crate::particle::ParticleData;
use glam::Vec2;
use indexmap::IndexMap;

/// The output of one extraction, together with the canvas it belongs to.
///
/// Both the live engine and the code generator start from a `Scene`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub particles: Vec<ParticleData>,
}

impl Scene {
    pub fn new(width: u32, height: u32, particles: Vec<ParticleData>) -> Self {
        Self {
            width,
            height,
            particles,
        }
    }

    /// Extract a scene sized to the input image.
    pub fn extract(input: &ExtractionInput<'_>) -> Self {
        Self::new(input.image.width(), input.image.height(), extract(input))
    }

    /// Canvas midpoint.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particle indices per optional-mask slug, slugs in first-seen order.
    pub fn mask_groups(&self) -> IndexMap<String, Vec<usize>> {
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (i, particle) in self.particles.iter().enumerate() {
            for slug in &particle.optional_mask_slugs {
                groups.entry(slug.clone()).or_default().push(i);
            }
        }
        groups
    }

    /// Number of particles inside the interaction mask.
    pub fn masked_count(&self) -> usize {
        self.particles.iter().filter(|p| p.masked).count()
    }
}
