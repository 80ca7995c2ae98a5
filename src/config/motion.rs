//! Motion and pointer interaction settings

use crate::ConfigEnum;
use serde::{Deserialize, Serialize};

/// Pointer force law applied to particles inside `mouse_radius`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ConfigEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// Push particles away from the pointer
    #[default]
    Push,
    /// Pull particles toward the pointer
    Pull,
    /// Swirl particles around the pointer
    Orbit,
    /// Shake particles with two sinusoidal fields
    Turbulence,
}

/// Spring, friction and pointer settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Velocity multiplier per frame, in (0, 1).
    pub friction: f32,
    /// Spring constant pulling particles back to their origin.
    pub return_speed: f32,
    /// Global multiplier on the spring.
    pub speed: f32,
    pub mouse_radius: f32,
    pub mouse_force: f32,
    pub interaction_mode: InteractionMode,
    pub orbit_speed: f32,
    pub turbulence_intensity: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            friction: 0.9,
            return_speed: 0.05,
            speed: 1.0,
            mouse_radius: 100.0,
            mouse_force: 5.0,
            interaction_mode: InteractionMode::Push,
            orbit_speed: 1.0,
            turbulence_intensity: 1.0,
        }
    }
}
