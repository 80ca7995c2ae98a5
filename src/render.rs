//! Batched particle rendering.
//!
//! Particles are bucketed by display color into an unmasked and a masked
//! layer. Each bucket accumulates every particle's shape into one path and
//! is filled with a single call, so the number of fills is bounded by the
//! number of distinct colors rather than the number of particles.

use crate::canvas::{Canvas, Path, Rgba};
use crate::color::{shift_color_by_velocity, Rgb};
use crate::config::{ParticleConfig, ParticleShape};
use crate::particle::Particle;
use glam::Vec2;
use indexmap::IndexMap;

/// How many following particles each particle checks for connections.
pub const CONNECTION_LOOKAHEAD: usize = 50;
pub const CONNECTION_WIDTH: f32 = 1.0;

/// What one rendered frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub particles: usize,
    pub color_groups: usize,
    pub connections: usize,
}

/// Color buckets for one layer, in first-seen order.
type Layer = IndexMap<Rgb, Path>;

/// Display color of a particle this frame.
///
/// Velocity color advances the particle's rainbow accumulator.
pub fn display_color(particle: &mut Particle, config: &ParticleConfig) -> Rgb {
    let vc = &config.velocity_color;
    if !vc.enabled {
        return particle.color;
    }
    let speed = particle.speed();
    shift_color_by_velocity(
        particle.color,
        speed,
        vc.intensity,
        vc.mode,
        vc.target_color,
        &mut particle.hue_offset,
    )
}

/// Draw a frame of `particles`. Pending particles are skipped.
pub fn render_frame<C: Canvas + ?Sized>(
    canvas: &mut C,
    particles: &mut [Particle],
    config: &ParticleConfig,
    shape: ParticleShape,
) -> RenderStats {
    let render = &config.render;
    let (width, height) = canvas.size();

    if render.trails_enabled {
        canvas.fill_rect(
            Vec2::ZERO,
            Vec2::new(width as f32, height as f32),
            Rgba::new(render.trail_background, render.trail_alpha()),
        );
    } else {
        canvas.clear();
    }

    let connections = if render.connections_enabled {
        draw_connections(canvas, particles, config)
    } else {
        0
    };

    let mut unmasked = Layer::new();
    let mut masked = Layer::new();
    let mut drawn = 0;

    for particle in particles.iter_mut().filter(|p| p.is_active()) {
        let color = display_color(particle, config);
        let layer = if particle.masked { &mut masked } else { &mut unmasked };
        shape.trace(layer.entry(color).or_default(), particle.position, particle.size);
        drawn += 1;
    }

    let color_groups = unmasked.len() + masked.len();
    let (first, second) = if render.masked_on_top {
        (&unmasked, &masked)
    } else {
        (&masked, &unmasked)
    };
    for (color, path) in first.iter().chain(second.iter()) {
        canvas.fill_path(path, Rgba::opaque(*color));
    }

    RenderStats {
        particles: drawn,
        color_groups,
        connections,
    }
}

/// Stroke a line between nearby active particles.
///
/// Only the next [`CONNECTION_LOOKAHEAD`] particles in array order are
/// checked. Extraction order is raster order, so neighbors in the array are
/// mostly neighbors on screen.
fn draw_connections<C: Canvas + ?Sized>(canvas: &mut C, particles: &[Particle], config: &ParticleConfig) -> usize {
    let render = &config.render;
    let max_dist = render.connection_distance;
    if max_dist <= 0.0 {
        return 0;
    }

    let mut count = 0;
    for (i, a) in particles.iter().enumerate() {
        if !a.is_active() {
            continue;
        }
        let end = (i + 1 + CONNECTION_LOOKAHEAD).min(particles.len());
        for b in particles[i + 1..end].iter().filter(|b| b.is_active()) {
            let dist = a.position.distance(b.position);
            if dist >= max_dist {
                continue;
            }
            let alpha = (1.0 - dist / max_dist) * render.connection_opacity;
            let mut line = Path::new();
            line.move_to(a.position).line_to(b.position);
            canvas.stroke_path(&line, Rgba::new(render.connection_color, alpha), CONNECTION_WIDTH);
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCall, RecordingCanvas};
    use crate::particle::{ParticleData, ParticleState};

    fn particle(x: f32, y: f32, color: Rgb, masked: bool) -> Particle {
        let mut data = ParticleData::new(x, y, color);
        data.masked = masked;
        Particle::at_rest(&data, 2.0)
    }

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn test_one_fill_per_color_group() {
        let mut particles: Vec<Particle> = (0..100)
            .map(|i| particle(i as f32, 0.0, if i % 2 == 0 { RED } else { BLUE }, false))
            .collect();
        let mut canvas = RecordingCanvas::new(100, 10);
        let stats = render_frame(&mut canvas, &mut particles, &ParticleConfig::default(), ParticleShape::Circle);

        assert_eq!(stats.particles, 100);
        assert_eq!(stats.color_groups, 2);
        assert_eq!(canvas.fill_count(), 2);
        assert_eq!(canvas.calls()[0], DrawCall::Clear);
        let colors: Vec<Rgb> = canvas.fill_colors().iter().map(|c| c.rgb).collect();
        assert_eq!(colors, vec![RED, BLUE]);
    }

    #[test]
    fn test_masked_layer_order() {
        let mut particles = vec![particle(0.0, 0.0, BLUE, true), particle(5.0, 0.0, RED, false)];
        let mut config = ParticleConfig::default();

        config.render.masked_on_top = true;
        let mut canvas = RecordingCanvas::new(10, 10);
        render_frame(&mut canvas, &mut particles, &config, ParticleShape::Square);
        let on_top: Vec<Rgb> = canvas.fill_colors().iter().map(|c| c.rgb).collect();
        assert_eq!(on_top, vec![RED, BLUE]);

        config.render.masked_on_top = false;
        let mut canvas = RecordingCanvas::new(10, 10);
        render_frame(&mut canvas, &mut particles, &config, ParticleShape::Square);
        let below: Vec<Rgb> = canvas.fill_colors().iter().map(|c| c.rgb).collect();
        assert_eq!(below, vec![BLUE, RED]);
    }

    #[test]
    fn test_same_color_masked_and_unmasked_are_separate_groups() {
        let mut particles = vec![particle(0.0, 0.0, RED, true), particle(5.0, 0.0, RED, false)];
        let mut canvas = RecordingCanvas::new(10, 10);
        let stats = render_frame(&mut canvas, &mut particles, &ParticleConfig::default(), ParticleShape::Circle);
        assert_eq!(stats.color_groups, 2);
    }

    #[test]
    fn test_pending_particles_are_not_drawn() {
        let mut particles = vec![particle(0.0, 0.0, RED, false), particle(5.0, 0.0, BLUE, false)];
        particles[1].state = ParticleState::Pending;
        let mut canvas = RecordingCanvas::new(10, 10);
        let stats = render_frame(&mut canvas, &mut particles, &ParticleConfig::default(), ParticleShape::Circle);
        assert_eq!(stats.particles, 1);
        assert_eq!(canvas.fill_count(), 1);
    }

    #[test]
    fn test_trails_fill_instead_of_clear() {
        let mut particles = vec![particle(1.0, 1.0, RED, false)];
        let mut config = ParticleConfig::default();
        config.render.trails_enabled = true;
        config.render.trail_length = 0.75;
        let mut canvas = RecordingCanvas::new(10, 20);
        render_frame(&mut canvas, &mut particles, &config, ParticleShape::Circle);
        match &canvas.calls()[0] {
            DrawCall::FillRect { min, size, color } => {
                assert_eq!(*min, Vec2::ZERO);
                assert_eq!(*size, Vec2::new(10.0, 20.0));
                assert!((color.alpha - 0.25).abs() < 1e-6);
            }
            other => panic!("expected trail fill, got {other:?}"),
        }
    }

    #[test]
    fn test_connections_fade_with_distance() {
        let mut particles = vec![
            particle(0.0, 0.0, RED, false),
            particle(5.0, 0.0, RED, false),
            particle(50.0, 0.0, RED, false),
        ];
        let mut config = ParticleConfig::default();
        config.render.connections_enabled = true;
        config.render.connection_distance = 10.0;
        config.render.connection_opacity = 0.8;
        let mut canvas = RecordingCanvas::new(60, 10);
        let stats = render_frame(&mut canvas, &mut particles, &config, ParticleShape::Circle);
        assert_eq!(stats.connections, 1);
        let stroke = canvas
            .calls()
            .iter()
            .find_map(|c| match c {
                DrawCall::StrokePath { color, .. } => Some(*color),
                _ => None,
            })
            .unwrap();
        assert!((stroke.alpha - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_connection_lookahead_is_bounded() {
        // Particle 0 and particle 60 overlap but are too far apart in the array.
        let mut particles: Vec<Particle> = (0..61).map(|i| particle(i as f32 * 100.0, 0.0, RED, false)).collect();
        particles[60].position = Vec2::ZERO;
        let mut config = ParticleConfig::default();
        config.render.connections_enabled = true;
        config.render.connection_distance = 10.0;
        let mut canvas = RecordingCanvas::new(10, 10);
        let stats = render_frame(&mut canvas, &mut particles, &config, ParticleShape::Circle);
        assert_eq!(stats.connections, 0);
    }

    #[test]
    fn test_velocity_color_splits_groups() {
        let mut particles = vec![particle(0.0, 0.0, RED, false), particle(5.0, 0.0, RED, false)];
        particles[1].velocity = Vec2::new(3.0, 4.0);
        let mut config = ParticleConfig::default();
        config.velocity_color.enabled = true;
        let mut canvas = RecordingCanvas::new(10, 10);
        let stats = render_frame(&mut canvas, &mut particles, &config, ParticleShape::Circle);
        assert_eq!(stats.color_groups, 2);
    }
}
