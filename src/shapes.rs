//! Particle shapes.
//!
//! Each shape is traced into a shared [`Path`] so a whole color group is
//! filled at once. `size` is the shape's half-extent: a circle's radius, a
//! square's half side.

use crate::canvas::Path;
use crate::config::ParticleShape;
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Star inner radius relative to the outer one.
pub const STAR_INNER_RATIO: f32 = 0.5;
/// Outer plus inner vertices of the five-point star.
pub const STAR_VERTICES: usize = 10;

impl ParticleShape {
    /// Add one particle of this shape to `path`.
    pub fn trace(&self, path: &mut Path, center: Vec2, size: f32) {
        let (x, y) = (center.x, center.y);
        match self {
            ParticleShape::Circle => {
                path.move_to(Vec2::new(x + size, y)).arc(center, size, 0.0, TAU);
            }
            ParticleShape::Square => {
                path.rect(center - Vec2::splat(size), Vec2::splat(size * 2.0));
            }
            ParticleShape::Triangle => {
                path.move_to(Vec2::new(x, y - size))
                    .line_to(Vec2::new(x + size, y + size))
                    .line_to(Vec2::new(x - size, y + size))
                    .close();
            }
            ParticleShape::Diamond => {
                path.move_to(Vec2::new(x, y - size))
                    .line_to(Vec2::new(x + size, y))
                    .line_to(Vec2::new(x, y + size))
                    .line_to(Vec2::new(x - size, y))
                    .close();
            }
            ParticleShape::Star => {
                let step = PI / 5.0;
                for i in 0..STAR_VERTICES {
                    let r = if i % 2 == 0 { size } else { size * STAR_INNER_RATIO };
                    let a = -FRAC_PI_2 + step * i as f32;
                    let p = center + Vec2::new(a.cos(), a.sin()) * r;
                    if i == 0 {
                        path.move_to(p);
                    } else {
                        path.line_to(p);
                    }
                }
                path.close();
            }
            ParticleShape::Heart => {
                let s = size;
                let p = |dx: f32, dy: f32| Vec2::new(x + dx * s, y + dy * s);
                path.move_to(p(0.0, -0.3))
                    .cubic_to(p(0.0, -0.6), p(-1.0, -0.6), p(-1.0, -0.1))
                    .cubic_to(p(-1.0, 0.4), p(0.0, 0.6), p(0.0, 1.0))
                    .cubic_to(p(0.0, 0.6), p(1.0, 0.4), p(1.0, -0.1))
                    .cubic_to(p(1.0, -0.6), p(0.0, -0.6), p(0.0, -0.3))
                    .close();
            }
        }
    }

    /// JavaScript tracing this shape into the current canvas path.
    ///
    /// Expects `ctx`, `x`, `y` and `size` in scope.
    pub fn to_js(&self) -> String {
        match self {
            ParticleShape::Circle => "  ctx.moveTo(x + size, y);\n  ctx.arc(x, y, size, 0, Math.PI * 2);\n".into(),
            ParticleShape::Square => "  ctx.rect(x - size, y - size, size * 2, size * 2);\n".into(),
            ParticleShape::Triangle => "  ctx.moveTo(x, y - size);\n\
                 \x20 ctx.lineTo(x + size, y + size);\n\
                 \x20 ctx.lineTo(x - size, y + size);\n\
                 \x20 ctx.closePath();\n"
                .into(),
            ParticleShape::Diamond => "  ctx.moveTo(x, y - size);\n\
                 \x20 ctx.lineTo(x + size, y);\n\
                 \x20 ctx.lineTo(x, y + size);\n\
                 \x20 ctx.lineTo(x - size, y);\n\
                 \x20 ctx.closePath();\n"
                .into(),
            ParticleShape::Star => format!(
                "  for (let i = 0; i < {STAR_VERTICES}; i++) {{\n\
                 \x20   const r = i % 2 === 0 ? size : size * {STAR_INNER_RATIO:?};\n\
                 \x20   const a = -Math.PI / 2 + (Math.PI / 5) * i;\n\
                 \x20   const px = x + Math.cos(a) * r;\n\
                 \x20   const py = y + Math.sin(a) * r;\n\
                 \x20   if (i === 0) ctx.moveTo(px, py);\n\
                 \x20   else ctx.lineTo(px, py);\n\
                 \x20 }}\n\
                 \x20 ctx.closePath();\n"
            ),
            ParticleShape::Heart => "  ctx.moveTo(x, y - size * 0.3);\n\
                 \x20 ctx.bezierCurveTo(x, y - size * 0.6, x - size, y - size * 0.6, x - size, y - size * 0.1);\n\
                 \x20 ctx.bezierCurveTo(x - size, y + size * 0.4, x, y + size * 0.6, x, y + size);\n\
                 \x20 ctx.bezierCurveTo(x, y + size * 0.6, x + size, y + size * 0.4, x + size, y - size * 0.1);\n\
                 \x20 ctx.bezierCurveTo(x + size, y - size * 0.6, x, y - size * 0.6, x, y - size * 0.3);\n\
                 \x20 ctx.closePath();\n"
                .into(),
        }
    }
}
