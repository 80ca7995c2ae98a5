//! Module-level pieces of the exported component: baked constants, types
//! and helper functions.
//!
//! Every helper is only emitted when the configuration enables it, and
//! every number comes from the constant the engine itself uses.

use crate::color::{COLOR_JS, RGB_STRING_JS};
use crate::config::{IdleMode, InteractionMode, ParticleConfig, ParticleShape};
use crate::engine::{BOUNCE_SPRING_CUT, SETTLE_MS};
use crate::forces::IDLE_SCALE;
use crate::noise::NOISE_JS;
use crate::performance::{
    SkipController, FAST_FRAME_MS, MAX_SKIP_LEVEL, QUALITY_SLOW_RATIO, QUALITY_WINDOW, SLOW_FRAME_MS,
};
use crate::render::{CONNECTION_LOOKAHEAD, CONNECTION_WIDTH};
use crate::scene::Scene;
use crate::time::FIRST_FRAME_MS;

/// A number as a JavaScript literal. Non-finite values become `0`.
pub(crate) fn num(v: f32) -> String {
    if v.is_finite() {
        format!("{v}")
    } else {
        "0".into()
    }
}

/// Which optional paths the component needs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Features {
    pub reveal: bool,
    pub bounce: bool,
    pub idle: bool,
    pub quality: bool,
    pub trails: bool,
    pub connections: bool,
    pub velocity_color: bool,
    /// A square tracer is needed besides the configured shape.
    pub square_fallback: bool,
}

impl Features {
    pub fn of(config: &ParticleConfig) -> Self {
        let anim = &config.initial_animation;
        let render = &config.render;
        let quality = render.auto_performance;
        Self {
            reveal: anim.enabled,
            bounce: anim.enabled && anim.bounce_enabled,
            idle: config.idle.enabled,
            quality,
            trails: render.trails_enabled,
            connections: render.connections_enabled && render.connection_distance > 0.0,
            velocity_color: config.velocity_color.enabled,
            square_fallback: quality && render.shape != ParticleShape::Square,
        }
    }

    fn noise(&self, config: &ParticleConfig) -> bool {
        self.idle && matches!(config.idle.mode, IdleMode::Float | IdleMode::Turbulence)
    }
}

/// The `const` block at the top of the component.
pub(crate) fn constants(scene: &Scene, config: &ParticleConfig, features: &Features) -> String {
    let motion = &config.motion;
    let anim = &config.initial_animation;
    let idle = &config.idle;
    let render = &config.render;
    let vc = &config.velocity_color;
    let center = scene.center();

    let mut code = String::new();
    let mut line = |name: &str, value: String| code.push_str(&format!("const {name} = {value};\n"));

    line("WIDTH", scene.width.to_string());
    line("HEIGHT", scene.height.to_string());
    line("CENTER_X", num(center.x));
    line("CENTER_Y", num(center.y));

    line("FRICTION", num(motion.friction));
    line("RETURN_SPEED", num(motion.return_speed));
    line("SPEED", num(motion.speed));
    line("MOUSE_RADIUS", num(motion.mouse_radius));
    line("MOUSE_FORCE", num(motion.mouse_force));
    match motion.interaction_mode {
        InteractionMode::Orbit => line("ORBIT_SPEED", num(motion.orbit_speed)),
        InteractionMode::Turbulence => line("TURBULENCE_INTENSITY", num(motion.turbulence_intensity)),
        InteractionMode::Push | InteractionMode::Pull => {}
    }

    if features.reveal {
        line("PARTICLES_PER_SECOND", num(anim.particles_per_second));
        line("PARTICLE_SPEED", num(anim.particle_speed));
        line("SETTLE_MS", num(SETTLE_MS));
        line("MOUSE_DURING_ANIMATION", anim.mouse_interaction_during_animation.to_string());
    }
    if features.bounce {
        line(
            "BOUNCE_RETURN_SPEED",
            format!(
                "RETURN_SPEED * (1 - {} * {})",
                num(BOUNCE_SPRING_CUT),
                num(anim.bounce_intensity)
            ),
        );
        line("BOUNCE_FRICTION", num(anim.bounce_damping));
    }

    if features.idle {
        line("IDLE_SPEED", num(idle.speed));
        line("IDLE_STRENGTH", format!("{} * {}", num(idle.intensity), num(IDLE_SCALE)));
        line("IDLE_AFFECTS_MASKED", idle.affects_masked.to_string());
        if idle.mode == IdleMode::Turbulence {
            line("TURBULENCE_MOUSE_RADIUS", num(idle.turbulence_mouse_radius));
        }
    }

    line("FIRST_FRAME_MS", num(FIRST_FRAME_MS));
    line("SLOW_FRAME_MS", num(SLOW_FRAME_MS));
    line("FAST_FRAME_MS", num(FAST_FRAME_MS));
    line("MAX_SKIP_LEVEL", MAX_SKIP_LEVEL.to_string());
    line("BASE_SKIP", SkipController::baseline(scene.len()).to_string());
    if features.quality {
        line("QUALITY_WINDOW", QUALITY_WINDOW.to_string());
        line("QUALITY_SLOW_RATIO", num(QUALITY_SLOW_RATIO));
    }

    if features.trails {
        let c = render.trail_background;
        line(
            "TRAIL_FILL",
            format!("\"rgba({}, {}, {}, {})\"", c.r, c.g, c.b, num(render.trail_alpha())),
        );
    }
    if features.connections {
        let c = render.connection_color;
        line("CONNECTION_DISTANCE", num(render.connection_distance));
        line("CONNECTION_OPACITY", num(render.connection_opacity));
        line("CONNECTION_RGB", format!("\"{}, {}, {}\"", c.r, c.g, c.b));
        line("CONNECTION_LOOKAHEAD", CONNECTION_LOOKAHEAD.to_string());
        line("CONNECTION_WIDTH", num(CONNECTION_WIDTH));
    }
    line("MASKED_ON_TOP", render.masked_on_top.to_string());

    if features.velocity_color {
        line("VC_INTENSITY", num(vc.intensity));
        let t = vc.target_color;
        line("VC_TARGET", format!("[{}, {}, {}]", t.r, t.g, t.b));
    }

    code
}

pub(crate) const TYPES: &str = r#"
interface Particle {
  x: number;
  y: number;
  vx: number;
  vy: number;
  originX: number;
  originY: number;
  size: number;
  color: string;
  r: number;
  g: number;
  b: number;
  masked: boolean;
  active: boolean;
  hueOffset: number;
}

interface MouseState {
  x: number;
  y: number;
  active: boolean;
}
"#;

/// Module-level helper functions.
pub(crate) fn helpers(config: &ParticleConfig, features: &Features) -> String {
    let mut code = String::new();

    if features.noise(config) {
        code.push_str(NOISE_JS);
    }

    if features.velocity_color {
        let mode = config.velocity_color.mode;
        code.push_str(RGB_STRING_JS);
        if mode.uses_hsl() {
            code.push_str(COLOR_JS);
        }
        code.push_str(&format!(
            "\nfunction velocityColor(p: Particle): string {{\n\
             \x20 const speed = Math.hypot(p.vx, p.vy);\n\
             \x20 const factor = Math.min(speed * VC_INTENSITY * {}, {});\n\
             {}}}\n",
            num(crate::color::VELOCITY_FACTOR_SCALE),
            num(crate::color::VELOCITY_FACTOR_MAX),
            mode.to_js()
        ));
    }

    code.push_str(&format!(
        "\nfunction applyPointer(p: Particle, mouse: MouseState, time: number): void {{\n\
         \x20 if (MOUSE_RADIUS <= 0) return;\n\
         \x20 const dx = mouse.x - p.x;\n\
         \x20 const dy = mouse.y - p.y;\n\
         \x20 const distSq = dx * dx + dy * dy;\n\
         \x20 if (distSq === 0 || distSq >= MOUSE_RADIUS * MOUSE_RADIUS) return;\n\
         \x20 const dist = Math.sqrt(distSq);\n\
         \x20 const force = ((MOUSE_RADIUS - dist) / MOUSE_RADIUS) * MOUSE_FORCE;\n\
         \x20 const nx = dx / dist;\n\
         \x20 const ny = dy / dist;\n\
         {}}}\n",
        config.motion.interaction_mode.to_js()
    ));

    if features.idle {
        code.push_str(&format!(
            "\nfunction applyIdle(p: Particle, mouse: MouseState, idleTime: number): void {{\n{}}}\n",
            config.idle.mode.to_js()
        ));
    }

    code.push_str(&tracer("traceShape", config.render.shape));
    if features.square_fallback {
        code.push_str(&tracer("traceSquare", ParticleShape::Square));
    }

    if features.connections {
        code.push_str(CONNECTIONS_JS);
    }

    code
}

fn tracer(name: &str, shape: ParticleShape) -> String {
    format!(
        "\nfunction {name}(ctx: CanvasRenderingContext2D, x: number, y: number, size: number): void {{\n{}}}\n",
        shape.to_js()
    )
}

const CONNECTIONS_JS: &str = r#"
function drawConnections(ctx: CanvasRenderingContext2D, particles: Particle[]): void {
  ctx.lineWidth = CONNECTION_WIDTH;
  for (let i = 0; i < particles.length; i++) {
    const a = particles[i];
    if (!a.active) continue;
    const end = Math.min(i + 1 + CONNECTION_LOOKAHEAD, particles.length);
    for (let j = i + 1; j < end; j++) {
      const b = particles[j];
      if (!b.active) continue;
      const dist = Math.hypot(a.x - b.x, a.y - b.y);
      if (dist >= CONNECTION_DISTANCE) continue;
      ctx.strokeStyle = `rgba(${CONNECTION_RGB}, ${(1 - dist / CONNECTION_DISTANCE) * CONNECTION_OPACITY})`;
      ctx.beginPath();
      ctx.moveTo(a.x, a.y);
      ctx.lineTo(b.x, b.y);
      ctx.stroke();
    }
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::VelocityColorMode;

    #[test]
    fn test_num() {
        assert_eq!(num(2.0), "2");
        assert_eq!(num(0.05), "0.05");
        assert_eq!(num(f32::INFINITY), "0");
    }

    #[test]
    fn test_default_config_omits_optional_helpers() {
        let config = ParticleConfig::default();
        let features = Features::of(&config);
        let code = helpers(&config, &features);
        assert!(code.contains("function applyPointer"));
        assert!(code.contains("function traceShape"));
        assert!(code.contains("function traceSquare"));
        assert!(!code.contains("smoothNoise"));
        assert!(!code.contains("velocityColor"));
        assert!(!code.contains("applyIdle"));
        assert!(!code.contains("drawConnections"));
    }

    #[test]
    fn test_hsl_helpers_only_for_hsl_modes() {
        let mut config = ParticleConfig::default();
        config.velocity_color.enabled = true;
        config.velocity_color.mode = VelocityColorMode::Darken;
        let code = helpers(&config, &Features::of(&config));
        assert!(code.contains("function rgbString"));
        assert!(!code.contains("function rgbToHsl"));

        config.velocity_color.mode = VelocityColorMode::Rainbow;
        let code = helpers(&config, &Features::of(&config));
        assert!(code.contains("function rgbToHsl"));
        assert!(code.contains("p.hueOffset"));
    }

    #[test]
    fn test_wave_idle_needs_no_noise() {
        let mut config = ParticleConfig::default();
        config.idle.enabled = true;
        config.idle.mode = IdleMode::Wave;
        let code = helpers(&config, &Features::of(&config));
        assert!(code.contains("function applyIdle"));
        assert!(!code.contains("function smoothNoise"));
    }

    #[test]
    fn test_constants_follow_config() {
        let mut config = ParticleConfig::default();
        config.motion.friction = 0.75;
        config.initial_animation.enabled = true;
        config.initial_animation.bounce_enabled = true;
        config.initial_animation.bounce_intensity = 0.5;
        let scene = Scene::new(200, 100, Vec::new());
        let code = constants(&scene, &config, &Features::of(&config));
        assert!(code.contains("const WIDTH = 200;\n"));
        assert!(code.contains("const CENTER_Y = 50;\n"));
        assert!(code.contains("const FRICTION = 0.75;\n"));
        assert!(code.contains("const SETTLE_MS = 1500;\n"));
        assert!(code.contains("const BOUNCE_RETURN_SPEED = RETURN_SPEED * (1 - 0.8 * 0.5);\n"));
        assert!(code.contains("const BASE_SKIP = 0;\n"));
        assert!(!code.contains("ORBIT_SPEED"));
    }
}
