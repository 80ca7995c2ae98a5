//! Initial reveal and idle animation settings

use crate::ConfigEnum;
use serde::{Deserialize, Serialize};

/// Order and launch point of the initial reveal.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ConfigEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ShootingDirection {
    /// Activate by origin y, dropping in from above the canvas
    #[default]
    TopToBottom,
    /// Activate nearest-center first, flying out from the image center
    AllDirections,
}

/// Sequential reveal played when the simulation starts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InitialAnimationConfig {
    pub enabled: bool,
    pub particles_per_second: f32,
    pub shooting_direction: ShootingDirection,
    /// Launch speed in pixels per frame.
    pub particle_speed: f32,
    pub bounce_enabled: bool,
    /// In [0, 1]. Weakens the spring during the reveal so particles overshoot.
    pub bounce_intensity: f32,
    /// Friction used instead of `motion.friction` while bouncing.
    pub bounce_damping: f32,
    pub mouse_interaction_during_animation: bool,
}

impl Default for InitialAnimationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            particles_per_second: 2000.0,
            shooting_direction: ShootingDirection::TopToBottom,
            particle_speed: 10.0,
            bounce_enabled: false,
            bounce_intensity: 0.5,
            bounce_damping: 0.85,
            mouse_interaction_during_animation: false,
        }
    }
}

/// Ambient force field applied once the reveal is over.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ConfigEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IdleMode {
    /// Slow noise drift, paused while the pointer is engaged
    #[default]
    Float,
    /// Noise-driven unit force, fading out near the pointer
    Turbulence,
    /// Vertical sine wave along origin x
    Wave,
    /// Radial breathing around the canvas midpoint
    Pulse,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdleAnimationConfig {
    pub enabled: bool,
    pub mode: IdleMode,
    /// Idle clock rate.
    pub speed: f32,
    pub intensity: f32,
    /// Whether masked particles move too.
    pub affects_masked: bool,
    /// Turbulence fades to zero at the pointer and is full strength beyond this radius.
    pub turbulence_mouse_radius: f32,
}

impl Default for IdleAnimationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: IdleMode::Float,
            speed: 1.0,
            intensity: 0.5,
            affects_masked: false,
            turbulence_mouse_radius: 150.0,
        }
    }
}
