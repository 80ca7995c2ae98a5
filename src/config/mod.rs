//! Configuration types for particle scenes.
//!
//! [`ParticleConfig`] is plain data: the engine re-reads it every tick and
//! never mutates it. It serializes to JSON with every group defaulted, so
//! partial files load.
//!
//! Numeric fields are validated by whoever builds the config (the editor
//! clamps its sliders). Out-of-range values give odd motion, never a panic.

mod animation;
mod motion;
mod render;
mod sampling;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use animation::{IdleAnimationConfig, IdleMode, InitialAnimationConfig, ShootingDirection};
pub use motion::{InteractionMode, MotionConfig};
pub use render::{ParticleShape, RenderConfig, VelocityColorConfig};
pub use sampling::{ColorSourceConfig, SamplingConfig, SizeConfig};

/// Complete scene configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub sampling: SamplingConfig,
    pub size: SizeConfig,
    pub motion: MotionConfig,
    pub initial_animation: InitialAnimationConfig,
    pub idle: IdleAnimationConfig,
    pub velocity_color: VelocityColorConfig,
    pub render: RenderConfig,
    pub color: ColorSourceConfig,
}

impl ParticleConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether moving from `self` to `other` requires a new extraction.
    pub fn affects_sampling(&self, other: &ParticleConfig) -> bool {
        self.sampling != other.sampling || self.color != other.color
    }

    /// Whether moving from `self` to `other` requires rebuilding the
    /// runtime particles (sizes and the reveal are fixed at init).
    pub fn requires_reinit(&self, other: &ParticleConfig) -> bool {
        self.affects_sampling(other)
            || self.size != other.size
            || self.initial_animation != other.initial_animation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorFilter, Rgb, VelocityColorMode};

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ParticleConfig::from_json(
            r#"{ "motion": { "interaction_mode": "orbit" }, "render": { "shape": "heart" } }"#,
        )
        .unwrap();
        assert_eq!(config.motion.interaction_mode, InteractionMode::Orbit);
        assert_eq!(config.motion.friction, MotionConfig::default().friction);
        assert_eq!(config.render.shape, ParticleShape::Heart);
        assert_eq!(config.sampling, SamplingConfig::default());
    }

    #[test]
    fn test_enum_keys_are_kebab_case() {
        let mut config = ParticleConfig::default();
        config.velocity_color.mode = VelocityColorMode::HueShift;
        config.initial_animation.shooting_direction = ShootingDirection::AllDirections;
        config.color.color_filter = ColorFilter::Vintage;
        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["velocity_color"]["mode"], "hue-shift");
        assert_eq!(json["initial_animation"]["shooting_direction"], "all-directions");
        assert_eq!(json["color"]["color_filter"], "vintage");
        assert_eq!(json["render"]["trail_background"], "#000000");
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            ParticleConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let mut config = ParticleConfig::default();
        config.color.custom_palette = vec![Rgb::new(1, 2, 3)];
        config.idle.enabled = true;
        config.save(&path).unwrap();
        assert_eq!(ParticleConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ParticleConfig::load("/no/such/config.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_affects_sampling() {
        let base = ParticleConfig::default();

        let mut motion_only = base.clone();
        motion_only.motion.mouse_force = 20.0;
        motion_only.render.shape = ParticleShape::Star;
        assert!(!base.affects_sampling(&motion_only));
        assert!(!base.requires_reinit(&motion_only));

        let mut resampled = base.clone();
        resampled.sampling.resolution = 2;
        assert!(base.affects_sampling(&resampled));

        let mut recolored = base.clone();
        recolored.color.color_filter = ColorFilter::Sepia;
        assert!(base.affects_sampling(&recolored));

        let mut resized = base.clone();
        resized.size.particle_size = 5.0;
        assert!(!base.affects_sampling(&resized));
        assert!(base.requires_reinit(&resized));
    }

    #[test]
    fn test_trail_alpha_is_clamped() {
        let mut render = RenderConfig::default();
        render.trail_length = 1.0;
        assert_eq!(render.trail_alpha(), 0.02);
        render.trail_length = -1.0;
        assert_eq!(render.trail_alpha(), 1.0);
    }
}
