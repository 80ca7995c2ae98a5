//! Vector paths.

use glam::Vec2;
use std::f32::consts::TAU;

/// One path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo { c1: Vec2, c2: Vec2, to: Vec2 },
    /// Clockwise (in y-down space) arc from `start` to `end` radians.
    /// Connects to the current point with a line, like a 2D canvas `arc`.
    Arc { center: Vec2, radius: f32, start: f32, end: f32 },
    /// Closed axis-aligned rectangle as its own subpath.
    Rect { min: Vec2, size: Vec2 },
    Close,
}

/// An accumulated path. Many shapes go into one path so a whole color
/// group is filled with one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { c1, c2, to });
        self
    }

    pub fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) -> &mut Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start,
            end,
        });
        self
    }

    pub fn rect(&mut self, min: Vec2, size: Vec2) -> &mut Self {
        self.commands.push(PathCommand::Rect { min, size });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of subpaths started (moves and rects).
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_) | PathCommand::Rect { .. }))
            .count()
    }

    /// Flatten into closed polygons. Curves become line segments no
    /// longer than about `tolerance` pixels.
    pub fn flatten(&self, tolerance: f32) -> Vec<Vec<Vec2>> {
        let tolerance = tolerance.max(0.05);
        let mut polygons = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();

        let finish = |current: &mut Vec<Vec2>, polygons: &mut Vec<Vec<Vec2>>| {
            if current.len() >= 2 {
                polygons.push(std::mem::take(current));
            } else {
                current.clear();
            }
        };

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    finish(&mut current, &mut polygons);
                    current.push(p);
                }
                PathCommand::LineTo(p) => current.push(p),
                PathCommand::CubicTo { c1, c2, to } => {
                    let from = current.last().copied().unwrap_or(c1);
                    if current.is_empty() {
                        current.push(from);
                    }
                    let approx_len = from.distance(c1) + c1.distance(c2) + c2.distance(to);
                    let steps = ((approx_len / tolerance).ceil() as usize).clamp(2, 64);
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        current.push(cubic_point(from, c1, c2, to, t));
                    }
                }
                PathCommand::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => {
                    let sweep = (end - start).clamp(-TAU, TAU);
                    let steps = ((radius.abs() * sweep.abs() / tolerance).ceil() as usize).clamp(8, 128);
                    for i in 0..=steps {
                        let a = start + sweep * i as f32 / steps as f32;
                        current.push(center + Vec2::new(a.cos(), a.sin()) * radius);
                    }
                }
                PathCommand::Rect { min, size } => {
                    finish(&mut current, &mut polygons);
                    polygons.push(vec![
                        min,
                        min + Vec2::new(size.x, 0.0),
                        min + size,
                        min + Vec2::new(0.0, size.y),
                    ]);
                }
                PathCommand::Close => {
                    let start = current.first().copied();
                    finish(&mut current, &mut polygons);
                    // Drawing after a close continues from the subpath start.
                    if let Some(start) = start {
                        current.push(start);
                    }
                }
            }
        }
        finish(&mut current, &mut polygons);
        polygons
    }
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_own_polygon() {
        let mut path = Path::new();
        path.rect(Vec2::ZERO, Vec2::new(2.0, 3.0)).rect(Vec2::splat(10.0), Vec2::ONE);
        let polys = path.flatten(0.5);
        assert_eq!(polys.len(), 2);
        assert_eq!(polys[0][2], Vec2::new(2.0, 3.0));
        assert_eq!(path.subpath_count(), 2);
    }

    #[test]
    fn test_arc_stays_on_circle() {
        let mut path = Path::new();
        path.move_to(Vec2::new(15.0, 10.0)).arc(Vec2::splat(10.0), 5.0, 0.0, TAU);
        let polys = path.flatten(0.5);
        assert_eq!(polys.len(), 1);
        for p in &polys[0] {
            assert!((p.distance(Vec2::splat(10.0)) - 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_cubic_ends_at_target() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO)
            .cubic_to(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0), Vec2::new(10.0, 0.0));
        let polys = path.flatten(0.5);
        assert_eq!(*polys[0].last().unwrap(), Vec2::new(10.0, 0.0));
        assert!(polys[0].len() > 3);
    }

    #[test]
    fn test_degenerate_subpaths_are_dropped() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO).move_to(Vec2::ONE).line_to(Vec2::new(2.0, 1.0));
        assert_eq!(path.flatten(0.5).len(), 1);
    }
}
