//! Built-in scene presets

use particula::config::{
    IdleAnimationConfig, InitialAnimationConfig, MotionConfig, RenderConfig, VelocityColorConfig,
};
use particula::prelude::*;

pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: fn() -> ParticleConfig,
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "Default",
        description: "Particles push away from the pointer and spring back",
        config: ParticleConfig::default,
    },
    Preset {
        name: "Whirlpool",
        description: "Pointer drags particles into an orbit, colored by speed",
        config: || ParticleConfig {
            motion: MotionConfig {
                interaction_mode: InteractionMode::Orbit,
                mouse_radius: 140.0,
                mouse_force: 4.0,
                orbit_speed: 1.5,
                ..Default::default()
            },
            velocity_color: VelocityColorConfig {
                enabled: true,
                mode: VelocityColorMode::HueShift,
                intensity: 1.5,
                ..Default::default()
            },
            ..Default::default()
        },
    },
    Preset {
        name: "Firework Reveal",
        description: "Particles launch from the center and bounce into place",
        config: || ParticleConfig {
            initial_animation: InitialAnimationConfig {
                enabled: true,
                particles_per_second: 3000.0,
                shooting_direction: ShootingDirection::AllDirections,
                particle_speed: 18.0,
                bounce_enabled: true,
                bounce_intensity: 0.6,
                ..Default::default()
            },
            render: RenderConfig {
                shape: ParticleShape::Star,
                trails_enabled: true,
                trail_length: 0.7,
                ..Default::default()
            },
            ..Default::default()
        },
    },
    Preset {
        name: "Drifting Logo",
        description: "Gentle floating idle motion with faint connection lines",
        config: || ParticleConfig {
            idle: IdleAnimationConfig {
                enabled: true,
                mode: IdleMode::Float,
                speed: 0.6,
                intensity: 0.8,
                ..Default::default()
            },
            render: RenderConfig {
                connections_enabled: true,
                connection_distance: 14.0,
                connection_opacity: 0.2,
                ..Default::default()
            },
            ..Default::default()
        },
    },
    Preset {
        name: "Magnet",
        description: "Particles are pulled toward the pointer",
        config: || ParticleConfig {
            motion: MotionConfig {
                interaction_mode: InteractionMode::Pull,
                friction: 0.85,
                return_speed: 0.03,
                ..Default::default()
            },
            ..Default::default()
        },
    },
];

/// Look up a preset by name, ignoring case.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
