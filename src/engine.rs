//! Simulation engine.
//!
//! One [`Engine`] owns the runtime particles for one canvas. Each call to
//! [`Engine::tick`] runs a full frame:
//!
//! 1. frame timing, adaptive skip and the one-shot quality decision
//! 2. the initial reveal (activating pending particles)
//! 3. pointer forces, idle fields, spring return, friction, integration
//! 4. rendering, unless the skip controller dropped this frame
//!
//! Physics runs every tick; only drawing is throttled.
//!
//! ```ignore
//! let scene = Scene::extract(&ExtractionInput::new(&image, &config));
//! let mut engine = Engine::new(scene, config);
//! let mut canvas = PixelCanvas::new(image.width(), image.height());
//!
//! engine.set_pointer(Vec2::new(120.0, 80.0));
//! let stats = engine.tick(now_ms, &mut canvas);
//! ```

use crate::canvas::Canvas;
use crate::config::{ParticleConfig, ParticleShape, ShootingDirection};
use crate::forces::{idle_force, pointer_force, spring_force};
use crate::input::Pointer;
use crate::particle::{spawn_particles, Particle, ParticleState};
use crate::performance::{QualityController, QualityState, SkipController};
use crate::render::{render_frame, RenderStats};
use crate::scene::Scene;
use crate::time::FrameClock;
use glam::Vec2;

/// Settling time after the last particle is activated before the reveal
/// counts as complete.
pub const SETTLE_MS: f32 = 1500.0;

/// Share of the spring removed at full bounce intensity.
pub const BOUNCE_SPRING_CUT: f32 = 0.8;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame_time_ms: f32,
    pub fps: f32,
    /// Effective skip (adaptive level or particle-count baseline).
    pub skip_level: u32,
    /// Whether the canvas was touched this tick.
    pub rendered: bool,
    pub active_particles: usize,
    pub quality: QualityState,
    /// Draw statistics; zero when the frame was skipped.
    pub render: RenderStats,
}

/// Sequential reveal state.
#[derive(Debug, Clone)]
struct Reveal {
    /// Particle indices in activation order.
    order: Vec<usize>,
    activated: usize,
    /// Fractional activation budget.
    budget: f32,
    settled_ms: f32,
    complete: bool,
}

impl Reveal {
    fn finished() -> Self {
        Self {
            order: Vec::new(),
            activated: 0,
            budget: 0.0,
            settled_ms: 0.0,
            complete: true,
        }
    }

    /// Mark every particle pending and sort the activation order.
    fn start(particles: &mut [Particle], direction: ShootingDirection, center: Vec2) -> Self {
        for p in particles.iter_mut() {
            p.state = ParticleState::Pending;
        }
        let mut order: Vec<usize> = (0..particles.len()).collect();
        match direction {
            ShootingDirection::TopToBottom => {
                order.sort_by(|&a, &b| particles[a].origin.y.total_cmp(&particles[b].origin.y));
            }
            ShootingDirection::AllDirections => {
                let dist = |i: usize| particles[i].origin.distance_squared(center);
                order.sort_by(|&a, &b| dist(a).total_cmp(&dist(b)));
            }
        }
        Self {
            order,
            activated: 0,
            budget: 0.0,
            settled_ms: 0.0,
            complete: false,
        }
    }

    fn advance(&mut self, particles: &mut [Particle], config: &ParticleConfig, frame_ms: f32, center: Vec2) {
        if self.complete {
            return;
        }
        let anim = &config.initial_animation;
        self.budget += anim.particles_per_second * frame_ms / 1000.0;
        let target = (self.budget.max(0.0).floor() as usize).min(self.order.len());

        for &i in &self.order[self.activated.min(target)..target] {
            let Some(p) = particles.get_mut(i) else {
                continue;
            };
            let (from, velocity) = match anim.shooting_direction {
                ShootingDirection::TopToBottom => (
                    Vec2::new(p.origin.x, -p.size),
                    Vec2::new(0.0, anim.particle_speed),
                ),
                ShootingDirection::AllDirections => (
                    center,
                    (p.origin - center).normalize_or_zero() * anim.particle_speed,
                ),
            };
            p.launch(from, velocity);
        }
        self.activated = self.activated.max(target);

        if self.activated == self.order.len() {
            self.settled_ms += frame_ms;
            if self.settled_ms >= SETTLE_MS {
                self.complete = true;
                log::debug!("initial animation complete ({} particles)", self.order.len());
            }
        }
    }
}

/// Per-tick physics inputs that don't change across particles.
struct StepParams {
    interaction_allowed: bool,
    idle_enabled: bool,
    return_speed: f32,
    friction: f32,
    pointer: Option<Vec2>,
    time_ms: f64,
    idle_time: f32,
    center: Vec2,
}

fn integrate(particles: &mut [Particle], config: &ParticleConfig, step: &StepParams) {
    let motion = &config.motion;
    let idle = &config.idle;

    for p in particles.iter_mut().filter(|p| p.is_active()) {
        if step.interaction_allowed && !p.masked {
            if let Some(pointer) = step.pointer {
                p.velocity += pointer_force(motion, p.position, pointer, step.time_ms);
            }
        }

        if step.idle_enabled && (!p.masked || idle.affects_masked) {
            p.velocity += idle_force(idle, p.origin, p.position, step.idle_time, step.pointer, step.center);
        }

        p.velocity += spring_force(p.position, p.origin, step.return_speed, motion.speed);
        p.velocity *= step.friction;
        p.position += p.velocity;
    }
}

/// The live particle simulation for one canvas.
pub struct Engine {
    config: ParticleConfig,
    scene: Scene,
    particles: Vec<Particle>,
    reveal: Reveal,
    clock: FrameClock,
    skip: SkipController,
    quality: QualityController,
    pointer: Pointer,
    /// Idle clock in seconds, scaled by `idle.speed`.
    idle_time: f32,
}

impl Engine {
    pub fn new(scene: Scene, config: ParticleConfig) -> Self {
        let mut particles = spawn_particles(&scene.particles, &config.size, config.sampling.seed);
        let reveal = if config.initial_animation.enabled {
            Reveal::start(&mut particles, config.initial_animation.shooting_direction, scene.center())
        } else {
            Reveal::finished()
        };

        log::debug!(
            "engine initialized: {} particles on {}x{} canvas",
            particles.len(),
            scene.width,
            scene.height
        );
        Self {
            quality: QualityController::new(config.render.auto_performance),
            config,
            scene,
            particles,
            reveal,
            clock: FrameClock::new(),
            skip: SkipController::new(),
            pointer: Pointer::new(),
            idle_time: 0.0,
        }
    }

    /// Discard all runtime state and rebuild from a new scene.
    ///
    /// This is the only way to clear the quality lock.
    pub fn reinitialize(&mut self, scene: Scene, config: ParticleConfig) {
        let pointer = self.pointer;
        *self = Self::new(scene, config);
        self.pointer = pointer;
    }

    /// Rebuild from the current scene and configuration.
    pub fn reset(&mut self) {
        let scene = std::mem::take(&mut self.scene);
        let config = self.config.clone();
        self.reinitialize(scene, config);
    }

    /// Swap in a new configuration without rebuilding particles.
    ///
    /// Sampling, sizing and reveal settings only take effect on the next
    /// [`reinitialize`](Self::reinitialize). The quality lock is kept.
    pub fn update_config(&mut self, config: ParticleConfig) {
        if self.config.requires_reinit(&config) {
            log::debug!("config change needs reinitialization to take full effect");
        }
        if config.render.auto_performance != self.config.render.auto_performance {
            self.quality = QualityController::new(config.render.auto_performance);
        }
        self.config = config;
    }

    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer.set(position);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer.clear();
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_active()).count()
    }

    /// Whether the initial reveal has finished (always true when disabled).
    pub fn is_animation_complete(&self) -> bool {
        self.reveal.complete
    }

    pub fn quality(&self) -> QualityState {
        self.quality.state()
    }

    /// Shape drawn this frame, after any quality lock.
    pub fn effective_shape(&self) -> ParticleShape {
        self.quality.shape(self.config.render.shape)
    }

    pub fn idle_time(&self) -> f32 {
        self.idle_time
    }

    /// Run one frame at timestamp `now_ms` (milliseconds, monotonic).
    pub fn tick<C: Canvas + ?Sized>(&mut self, now_ms: f64, canvas: &mut C) -> FrameStats {
        let frame_ms = self.clock.tick(now_ms);
        let (skip_level, render) = self.skip.update(frame_ms, self.particles.len());

        if self.config.render.auto_performance {
            let active_window = !self.reveal.complete || self.pointer.is_engaged();
            self.quality.observe(frame_ms, active_window, self.config.render.shape);
        }

        let center = self.scene.center();
        self.reveal.advance(&mut self.particles, &self.config, frame_ms, center);

        let anim = &self.config.initial_animation;
        let motion = &self.config.motion;
        let complete = self.reveal.complete;
        let bouncing = anim.enabled && anim.bounce_enabled && !complete;
        let (return_speed, friction) = if bouncing {
            (
                motion.return_speed * (1.0 - BOUNCE_SPRING_CUT * anim.bounce_intensity),
                anim.bounce_damping,
            )
        } else {
            (motion.return_speed, motion.friction)
        };

        let idle_enabled = self.config.idle.enabled && complete;
        if idle_enabled {
            self.idle_time += self.clock.frame_seconds() * self.config.idle.speed;
        }

        let step = StepParams {
            interaction_allowed: complete || !anim.enabled || anim.mouse_interaction_during_animation,
            idle_enabled,
            return_speed,
            friction,
            pointer: self.pointer.position(),
            time_ms: now_ms,
            idle_time: self.idle_time,
            center,
        };
        integrate(&mut self.particles, &self.config, &step);

        let render_stats = if render {
            let shape = self.quality.shape(self.config.render.shape);
            render_frame(canvas, &mut self.particles, &self.config, shape)
        } else {
            RenderStats::default()
        };

        FrameStats {
            frame_time_ms: frame_ms,
            fps: self.clock.fps(),
            skip_level,
            rendered: render,
            active_particles: self.active_count(),
            quality: self.quality.state(),
            render: render_stats,
        }
    }
}
