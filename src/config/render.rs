//! Rendering and velocity color settings

use crate::color::{Rgb, VelocityColorMode};
use crate::ConfigEnum;
use serde::{Deserialize, Serialize};

/// Particle shape for rendering
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ConfigEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ParticleShape {
    #[default]
    Circle,
    Square,
    Triangle,
    Diamond,
    Star,
    Heart,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VelocityColorConfig {
    pub enabled: bool,
    pub mode: VelocityColorMode,
    pub intensity: f32,
    /// Color approached by [`VelocityColorMode::Brighten`].
    pub target_color: Rgb,
}

impl Default for VelocityColorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: VelocityColorMode::Brighten,
            intensity: 1.0,
            target_color: Rgb::WHITE,
        }
    }
}

/// How particles are drawn.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub shape: ParticleShape,
    /// Lock to squares when the first second of activity is slow.
    pub auto_performance: bool,
    pub trails_enabled: bool,
    /// In [0, 1]. Higher keeps more of the previous frame.
    pub trail_length: f32,
    pub trail_background: Rgb,
    pub connections_enabled: bool,
    pub connection_distance: f32,
    pub connection_opacity: f32,
    pub connection_color: Rgb,
    /// Draw the masked layer after the unmasked one.
    pub masked_on_top: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shape: ParticleShape::Circle,
            auto_performance: true,
            trails_enabled: false,
            trail_length: 0.5,
            trail_background: Rgb::BLACK,
            connections_enabled: false,
            connection_distance: 20.0,
            connection_opacity: 0.3,
            connection_color: Rgb::WHITE,
            masked_on_top: true,
        }
    }
}

impl RenderConfig {
    /// Alpha of the background wash painted over the previous frame.
    #[inline]
    pub fn trail_alpha(&self) -> f32 {
        (1.0 - self.trail_length).clamp(0.02, 1.0)
    }
}
