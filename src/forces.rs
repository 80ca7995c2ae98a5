//! Force laws.
//!
//! Every force here returns a velocity delta for one particle and one frame.
//! The same laws are emitted as JavaScript by the `to_js` methods, built
//! from the same constants, so exported components move like the preview.
//!
//! Variables the JavaScript fragments expect in scope:
//!
//! | name | meaning |
//! |------|---------|
//! | `p` | particle with `x, y, vx, vy, originX, originY` |
//! | `nx`, `ny`, `force` | pointer direction and strength (`applyPointer` only) |
//! | `time` | frame timestamp in milliseconds |
//! | `idleTime` | idle clock in seconds |
//! | `mouse` | `{ x, y, active }` |

use crate::config::{IdleAnimationConfig, IdleMode, InteractionMode, MotionConfig};
use crate::noise::smooth_noise;
use glam::Vec2;
use std::f32::consts::TAU;

/// Radial pull mixed into orbit so particles don't drift outward.
pub const ORBIT_PULL: f32 = 0.1;
/// Spatial frequency of the pointer turbulence fields.
pub const TURBULENCE_SPACE: f64 = 0.05;
/// Temporal frequencies (per ms) of the x and y turbulence fields.
pub const TURBULENCE_TIME_X: f64 = 0.003;
pub const TURBULENCE_TIME_Y: f64 = 0.002;

/// Scale from idle intensity to per-frame velocity.
pub const IDLE_SCALE: f32 = 0.1;
/// Offset between the two float noise samples.
pub const FLOAT_OFFSET: f32 = 1000.0;
pub const WAVE_FREQUENCY: f32 = 0.02;
pub const PULSE_FREQUENCY: f32 = 0.01;
/// Idle clock multiplier inside wave and pulse.
pub const IDLE_RATE: f32 = 2.0;

/// Pointer force on a particle at `position`.
///
/// Zero outside `mouse_radius`, at the pointer itself, or when the radius
/// is not positive.
pub fn pointer_force(motion: &MotionConfig, position: Vec2, pointer: Vec2, time_ms: f64) -> Vec2 {
    let radius = motion.mouse_radius;
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let d = pointer - position;
    let dist_sq = d.length_squared();
    if dist_sq == 0.0 || dist_sq >= radius * radius {
        return Vec2::ZERO;
    }
    let dist = dist_sq.sqrt();
    let force = (radius - dist) / radius * motion.mouse_force;
    let n = d / dist;

    match motion.interaction_mode {
        InteractionMode::Push => -n * force,
        InteractionMode::Pull => n * force,
        InteractionMode::Orbit => Vec2::new(-n.y, n.x) * force * motion.orbit_speed + n * force * ORBIT_PULL,
        InteractionMode::Turbulence => {
            let (x, y) = (position.x as f64, position.y as f64);
            let fx = (y * TURBULENCE_SPACE + time_ms * TURBULENCE_TIME_X).sin() as f32;
            let fy = (x * TURBULENCE_SPACE + time_ms * TURBULENCE_TIME_Y).cos() as f32;
            Vec2::new(fx, fy) * force * motion.turbulence_intensity
        }
    }
}

impl InteractionMode {
    /// Body of the exported `applyPointer` helper, after `nx`, `ny` and
    /// `force` are computed.
    pub fn to_js(&self) -> String {
        match self {
            InteractionMode::Push => "  p.vx -= nx * force;\n  p.vy -= ny * force;\n".into(),
            InteractionMode::Pull => "  p.vx += nx * force;\n  p.vy += ny * force;\n".into(),
            InteractionMode::Orbit => format!(
                "  p.vx += -ny * force * ORBIT_SPEED + nx * force * {ORBIT_PULL:?};\n\
                 \x20 p.vy += nx * force * ORBIT_SPEED + ny * force * {ORBIT_PULL:?};\n"
            ),
            InteractionMode::Turbulence => format!(
                "  p.vx += Math.sin(p.y * {TURBULENCE_SPACE:?} + time * {TURBULENCE_TIME_X:?}) * force * TURBULENCE_INTENSITY;\n\
                 \x20 p.vy += Math.cos(p.x * {TURBULENCE_SPACE:?} + time * {TURBULENCE_TIME_Y:?}) * force * TURBULENCE_INTENSITY;\n"
            ),
        }
    }
}

/// Idle force for a particle resting at `origin`, currently at `position`.
///
/// `idle_time` is the idle clock in seconds, `center` the canvas midpoint.
pub fn idle_force(
    idle: &IdleAnimationConfig,
    origin: Vec2,
    position: Vec2,
    idle_time: f32,
    pointer: Option<Vec2>,
    center: Vec2,
) -> Vec2 {
    let strength = idle.intensity * IDLE_SCALE;
    match idle.mode {
        IdleMode::Float => {
            if pointer.is_some() {
                return Vec2::ZERO;
            }
            Vec2::new(
                smooth_noise(origin.x, origin.y, idle_time),
                smooth_noise(origin.x + FLOAT_OFFSET, origin.y + FLOAT_OFFSET, idle_time),
            ) * strength
        }
        IdleMode::Turbulence => {
            let angle = smooth_noise(origin.x, origin.y, idle_time) * TAU;
            let fade = match pointer {
                Some(p) if idle.turbulence_mouse_radius > 0.0 => {
                    (position.distance(p) / idle.turbulence_mouse_radius).min(1.0)
                }
                _ => 1.0,
            };
            Vec2::new(angle.cos(), angle.sin()) * strength * fade
        }
        IdleMode::Wave => {
            let wave = (origin.x * WAVE_FREQUENCY + idle_time * IDLE_RATE).sin();
            Vec2::new(0.0, wave * strength)
        }
        IdleMode::Pulse => {
            let d = origin - center;
            let dist = d.length();
            if dist == 0.0 {
                return Vec2::ZERO;
            }
            let breath = (idle_time * IDLE_RATE - dist * PULSE_FREQUENCY).sin();
            d / dist * breath * strength
        }
    }
}

impl IdleMode {
    /// Body of the exported `applyIdle` helper. Expects `IDLE_STRENGTH`
    /// (`intensity * IDLE_SCALE`) to be defined.
    pub fn to_js(&self) -> String {
        match self {
            IdleMode::Float => format!(
                "  if (mouse.active) return;\n\
                 \x20 p.vx += smoothNoise(p.originX, p.originY, idleTime) * IDLE_STRENGTH;\n\
                 \x20 p.vy += smoothNoise(p.originX + {FLOAT_OFFSET:?}, p.originY + {FLOAT_OFFSET:?}, idleTime) * IDLE_STRENGTH;\n"
            ),
            IdleMode::Turbulence => "  const angle = smoothNoise(p.originX, p.originY, idleTime) * Math.PI * 2;\n\
                 \x20 let fade = 1;\n\
                 \x20 if (mouse.active && TURBULENCE_MOUSE_RADIUS > 0) {\n\
                 \x20   fade = Math.min(Math.hypot(p.x - mouse.x, p.y - mouse.y) / TURBULENCE_MOUSE_RADIUS, 1);\n\
                 \x20 }\n\
                 \x20 p.vx += Math.cos(angle) * IDLE_STRENGTH * fade;\n\
                 \x20 p.vy += Math.sin(angle) * IDLE_STRENGTH * fade;\n"
                .into(),
            IdleMode::Wave => format!(
                "  p.vy += Math.sin(p.originX * {WAVE_FREQUENCY:?} + idleTime * {IDLE_RATE:?}) * IDLE_STRENGTH;\n"
            ),
            IdleMode::Pulse => format!(
                "  const dx = p.originX - CENTER_X;\n\
                 \x20 const dy = p.originY - CENTER_Y;\n\
                 \x20 const dist = Math.hypot(dx, dy);\n\
                 \x20 if (dist === 0) return;\n\
                 \x20 const breath = Math.sin(idleTime * {IDLE_RATE:?} - dist * {PULSE_FREQUENCY:?});\n\
                 \x20 p.vx += (dx / dist) * breath * IDLE_STRENGTH;\n\
                 \x20 p.vy += (dy / dist) * breath * IDLE_STRENGTH;\n"
            ),
        }
    }
}

/// Spring pull toward `origin`.
#[inline]
pub fn spring_force(position: Vec2, origin: Vec2, return_speed: f32, speed: f32) -> Vec2 {
    (origin - position) * return_speed * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion(mode: InteractionMode) -> MotionConfig {
        MotionConfig {
            mouse_radius: 10.0,
            mouse_force: 2.0,
            interaction_mode: mode,
            orbit_speed: 1.0,
            ..MotionConfig::default()
        }
    }

    #[test]
    fn test_push_and_pull_are_opposite() {
        let pos = Vec2::new(5.0, 0.0);
        let pointer = Vec2::ZERO;
        let push = pointer_force(&motion(InteractionMode::Push), pos, pointer, 0.0);
        let pull = pointer_force(&motion(InteractionMode::Pull), pos, pointer, 0.0);
        // Pointer is to the left; push moves right.
        assert!((push - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert_eq!(push, -pull);
    }

    #[test]
    fn test_force_guards() {
        let push = motion(InteractionMode::Push);
        assert_eq!(pointer_force(&push, Vec2::ONE, Vec2::ONE, 0.0), Vec2::ZERO);
        assert_eq!(pointer_force(&push, Vec2::new(10.0, 0.0), Vec2::ZERO, 0.0), Vec2::ZERO);

        let zero_radius = MotionConfig {
            mouse_radius: 0.0,
            ..push.clone()
        };
        assert_eq!(pointer_force(&zero_radius, Vec2::new(1.0, 0.0), Vec2::ZERO, 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_orbit_is_mostly_tangential() {
        let f = pointer_force(&motion(InteractionMode::Orbit), Vec2::new(0.0, 5.0), Vec2::ZERO, 0.0);
        // n = (0, -1): tangent (1, 0) * 1.0, radial (0, -1) * 0.1.
        assert!((f - Vec2::new(1.0, -0.1)).length() < 1e-6);
    }

    #[test]
    fn test_turbulence_depends_on_time() {
        let m = motion(InteractionMode::Turbulence);
        let a = pointer_force(&m, Vec2::new(3.0, 4.0), Vec2::ZERO, 0.0);
        let b = pointer_force(&m, Vec2::new(3.0, 4.0), Vec2::ZERO, 500.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_float_pauses_under_pointer() {
        let idle = IdleAnimationConfig {
            enabled: true,
            mode: IdleMode::Float,
            ..IdleAnimationConfig::default()
        };
        let origin = Vec2::new(20.0, 30.0);
        assert_eq!(idle_force(&idle, origin, origin, 1.0, Some(Vec2::ZERO), Vec2::ZERO), Vec2::ZERO);
        assert_ne!(idle_force(&idle, origin, origin, 1.0, None, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_turbulence_fades_near_pointer() {
        let idle = IdleAnimationConfig {
            enabled: true,
            mode: IdleMode::Turbulence,
            turbulence_mouse_radius: 100.0,
            ..IdleAnimationConfig::default()
        };
        let origin = Vec2::new(40.0, 40.0);
        let free = idle_force(&idle, origin, origin, 2.0, None, Vec2::ZERO).length();
        let near = idle_force(&idle, origin, origin, 2.0, Some(Vec2::new(40.0, 65.0)), Vec2::ZERO).length();
        assert!((near - free * 0.25).abs() < 1e-5);
        let on_top = idle_force(&idle, origin, origin, 2.0, Some(origin), Vec2::ZERO);
        assert_eq!(on_top, Vec2::ZERO);
    }

    #[test]
    fn test_pulse_is_radial() {
        let idle = IdleAnimationConfig {
            enabled: true,
            mode: IdleMode::Pulse,
            ..IdleAnimationConfig::default()
        };
        let center = Vec2::new(50.0, 50.0);
        let f = idle_force(&idle, Vec2::new(80.0, 50.0), Vec2::ZERO, 0.3, None, center);
        assert!(f.y.abs() < 1e-6);
        assert_eq!(idle_force(&idle, center, center, 0.3, None, center), Vec2::ZERO);
    }

    #[test]
    fn test_wave_only_moves_vertically() {
        let idle = IdleAnimationConfig {
            enabled: true,
            mode: IdleMode::Wave,
            ..IdleAnimationConfig::default()
        };
        let f = idle_force(&idle, Vec2::new(33.0, 10.0), Vec2::ZERO, 1.2, None, Vec2::ZERO);
        assert_eq!(f.x, 0.0);
        assert!(f.y != 0.0);
    }

    #[test]
    fn test_spring() {
        let f = spring_force(Vec2::new(10.0, 0.0), Vec2::ZERO, 0.1, 2.0);
        assert!((f - Vec2::new(-2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_js_fragments_use_shared_constants() {
        assert!(InteractionMode::Orbit.to_js().contains("force * 0.1"));
        assert!(InteractionMode::Turbulence.to_js().contains("time * 0.003"));
        assert!(IdleMode::Wave.to_js().contains("p.originX * 0.02"));
        assert!(IdleMode::Float.to_js().contains("if (mouse.active) return;"));
    }
}
