//! Particle extraction.
//!
//! Turns an image, a configuration, masks and the edit list into an ordered
//! list of [`ParticleData`]. Extraction is a pure function of its inputs:
//! the grid is walked in raster order, add edits follow in list order, and
//! the only randomness (custom palette picks) comes from an RNG seeded by
//! the configuration.
//!
//! ```ignore
//! let particles = extract(&ExtractionInput::new(&image, &config).with_edits(&edits));
//! ```

use crate::color::{apply_color_filter, nearest_color, Rgb};
use crate::config::ParticleConfig;
use crate::edits::{EditKind, EditList};
use crate::image_buffer::ImageBuffer;
use crate::mask::{MaskBitmap, OptionalMask};
use crate::particle::ParticleData;
use crate::quantize::quantize_colors;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Everything extraction reads.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionInput<'a> {
    pub image: &'a ImageBuffer,
    pub config: &'a ParticleConfig,
    pub interaction_mask: Option<&'a MaskBitmap>,
    pub optional_masks: &'a [OptionalMask],
    pub edits: Option<&'a EditList>,
}

impl<'a> ExtractionInput<'a> {
    pub fn new(image: &'a ImageBuffer, config: &'a ParticleConfig) -> Self {
        Self {
            image,
            config,
            interaction_mask: None,
            optional_masks: &[],
            edits: None,
        }
    }

    pub fn with_mask(mut self, mask: &'a MaskBitmap) -> Self {
        self.interaction_mask = Some(mask);
        self
    }

    pub fn with_optional_masks(mut self, masks: &'a [OptionalMask]) -> Self {
        self.optional_masks = masks;
        self
    }

    pub fn with_edits(mut self, edits: &'a EditList) -> Self {
        self.edits = Some(edits);
        self
    }

    fn is_deleted(&self, point: Vec2) -> bool {
        self.edits.is_some_and(|e| e.is_deleted(point))
    }

    fn is_masked(&self, x: u32, y: u32) -> bool {
        self.interaction_mask.is_some_and(|m| m.is_masked(x, y))
    }

    fn slugs_at(&self, x: u32, y: u32) -> Vec<String> {
        self.optional_masks
            .iter()
            .filter(|m| m.contains(x, y))
            .map(|m| m.slug.clone())
            .collect()
    }
}

/// Pixel under `point`, or `None` when the point lies outside
/// `[0, width) x [0, height)`.
fn pixel_under(image: &ImageBuffer, point: Vec2) -> Option<(u32, u32)> {
    let (w, h) = (image.width(), image.height());
    let inside = point.x >= 0.0 && point.y >= 0.0 && point.x < w as f32 && point.y < h as f32;
    inside.then(|| {
        (
            (point.x.round() as u32).min(w.saturating_sub(1)),
            (point.y.round() as u32).min(h.saturating_sub(1)),
        )
    })
}

/// Upper bound on raster-sampled particles for a `width`x`height` image.
pub fn extraction_bound(width: u32, height: u32, gap: u32) -> usize {
    let gap = gap.max(1) as usize;
    (width as usize).div_ceil(gap) * (height as usize).div_ceil(gap)
}

/// Pick `max` evenly strided items, preserving order.
///
/// Index `i` of the result is `floor(i * n / max)` of the input.
pub fn downsample<T>(items: Vec<T>, max: usize) -> Vec<T> {
    let n = items.len();
    if n <= max {
        return items;
    }
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    (0..max)
        .filter_map(|i| slots[(i as u64 * n as u64 / max as u64) as usize].take())
        .collect()
}

/// Resolves the display color of each sampled pixel.
struct ColorResolver<'a> {
    config: &'a ParticleConfig,
    palette: Vec<Rgb>,
    rng: SmallRng,
}

impl<'a> ColorResolver<'a> {
    fn new(image: &ImageBuffer, config: &'a ParticleConfig) -> Self {
        let palette = if config.color.use_original_colors && config.sampling.color_clustering {
            quantize_colors(image, config.sampling.cluster_count)
        } else {
            Vec::new()
        };
        Self {
            config,
            palette,
            rng: SmallRng::seed_from_u64(config.sampling.seed),
        }
    }

    fn resolve(&mut self, pixel: Rgb) -> Rgb {
        let filtered = apply_color_filter(pixel, self.config.color.color_filter);
        if self.config.color.use_original_colors {
            if self.palette.is_empty() {
                filtered
            } else {
                nearest_color(&self.palette, filtered)
            }
        } else {
            let custom = &self.config.color.custom_palette;
            if custom.is_empty() {
                Rgb::WHITE
            } else {
                custom[self.rng.gen_range(0..custom.len())]
            }
        }
    }
}

/// Extract the particle list.
pub fn extract(input: &ExtractionInput<'_>) -> Vec<ParticleData> {
    let image = input.image;
    let sampling = &input.config.sampling;
    let gap = sampling.gap();
    let half = gap / 2;

    let mut colors = ColorResolver::new(image, input.config);
    let mut particles = Vec::new();
    let mut deleted = 0usize;

    for y in (half..image.height().saturating_sub(half)).step_by(gap as usize) {
        for x in (half..image.width().saturating_sub(half)).step_by(gap as usize) {
            let Some([r, g, b, a]) = image.pixel(x, y) else {
                continue;
            };
            if a < sampling.alpha_threshold {
                continue;
            }
            let point = Vec2::new(x as f32, y as f32);
            if input.is_deleted(point) {
                deleted += 1;
                continue;
            }
            particles.push(ParticleData {
                x: point.x,
                y: point.y,
                color: colors.resolve(Rgb::new(r, g, b)),
                masked: input.is_masked(x, y),
                optional_mask_slugs: input.slugs_at(x, y),
                size: None,
            });
        }
    }
    let sampled = particles.len();

    if let Some(edits) = input.edits {
        for edit in edits.of_kind(EditKind::Add) {
            let point = edit.position();
            if input.is_deleted(point) {
                deleted += 1;
                continue;
            }
            let under = pixel_under(image, point);
            let color = edit.color.unwrap_or_else(|| {
                under
                    .and_then(|(px, py)| image.pixel(px, py))
                    .map(|[r, g, b, _]| apply_color_filter(Rgb::new(r, g, b), input.config.color.color_filter))
                    .unwrap_or(Rgb::WHITE)
            });
            particles.push(ParticleData {
                x: point.x,
                y: point.y,
                color,
                masked: under.is_some_and(|(px, py)| input.is_masked(px, py)),
                optional_mask_slugs: edit.optional_mask_slugs.clone().unwrap_or_default(),
                size: edit.size,
            });
        }

        for edit in edits.of_kind(EditKind::Modify) {
            for particle in particles.iter_mut().filter(|p| edit.covers(p.position())) {
                if let Some(color) = edit.color {
                    particle.color = color;
                }
                if let Some(size) = edit.size {
                    particle.size = Some(size);
                }
            }
        }
    }

    let candidates = particles.len();
    let particles = downsample(particles, sampling.max_particles);

    log::debug!(
        "extracted {}x{} (gap {}): {} sampled, {} added, {} deleted, {} kept",
        image.width(),
        image.height(),
        gap,
        sampled,
        candidates - sampled,
        deleted,
        particles.len()
    );

    particles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> ImageBuffer {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 0, 255]);
            }
        }
        ImageBuffer::from_rgba(width, height, pixels).unwrap()
    }

    #[test]
    fn test_downsample_indices() {
        let picked = downsample((0..16).collect(), 5);
        assert_eq!(picked, vec![0, 3, 6, 9, 12]);
        assert_eq!(downsample((0..4).collect::<Vec<_>>(), 10), vec![0, 1, 2, 3]);
        assert!(downsample((0..4).collect::<Vec<_>>(), 0).is_empty());
    }

    #[test]
    fn test_downsample_matches_formula() {
        let n = 97;
        for max in 1..n {
            let picked = downsample((0..n).collect::<Vec<usize>>(), max);
            let expected: Vec<usize> = (0..max).map(|i| i * n / max).collect();
            assert_eq!(picked, expected, "max = {max}");
        }
    }

    #[test]
    fn test_grid_is_centered_in_cells() {
        // [half, dim - half) with half = 2 holds x = 2 and x = 6.
        let image = gradient(9, 9);
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 4;
        config.sampling.alpha_threshold = 0;
        let particles = extract(&ExtractionInput::new(&image, &config));
        let positions: Vec<(f32, f32)> = particles.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(positions, vec![(2.0, 2.0), (6.0, 2.0), (2.0, 6.0), (6.0, 6.0)]);
    }

    #[test]
    fn test_zero_resolution_is_gap_one() {
        let image = gradient(3, 2);
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 0;
        assert_eq!(extract(&ExtractionInput::new(&image, &config)).len(), 6);
    }

    #[test]
    fn test_alpha_threshold() {
        let image = ImageBuffer::from_rgba(2, 1, vec![1, 1, 1, 99, 2, 2, 2, 100]).unwrap();
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 1;
        config.sampling.alpha_threshold = 100;
        let particles = extract(&ExtractionInput::new(&image, &config));
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].color, Rgb::new(2, 2, 2));
    }

    #[test]
    fn test_custom_palette_is_seeded() {
        let image = gradient(10, 10);
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 1;
        config.color.use_original_colors = false;
        config.color.custom_palette = vec![Rgb::new(1, 0, 0), Rgb::new(0, 1, 0), Rgb::new(0, 0, 1)];

        let a = extract(&ExtractionInput::new(&image, &config));
        let b = extract(&ExtractionInput::new(&image, &config));
        assert_eq!(a, b);
        assert!(a.iter().all(|p| config.color.custom_palette.contains(&p.color)));

        config.color.custom_palette.clear();
        let white = extract(&ExtractionInput::new(&image, &config));
        assert!(white.iter().all(|p| p.color == Rgb::WHITE));
    }

    #[test]
    fn test_filter_applies_to_original_colors() {
        let image = ImageBuffer::filled(2, 2, [10, 20, 30, 255]).unwrap();
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 1;
        config.color.color_filter = crate::color::ColorFilter::Invert;
        let particles = extract(&ExtractionInput::new(&image, &config));
        assert!(particles.iter().all(|p| p.color == Rgb::new(245, 235, 225)));
    }

    #[test]
    fn test_clustering_snaps_to_palette() {
        let image = gradient(20, 20);
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 2;
        config.sampling.color_clustering = true;
        config.sampling.cluster_count = 3;
        let palette = quantize_colors(&image, 3);
        let particles = extract(&ExtractionInput::new(&image, &config));
        assert!(!particles.is_empty());
        assert!(particles.iter().all(|p| palette.contains(&p.color)));
    }

    #[test]
    fn test_masks_tag_particles() {
        let image = gradient(4, 1);
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 1;

        let mut interaction = MaskBitmap::new(4, 1);
        interaction.paint(Vec2::new(0.5, 0.5), 0.6, true);
        let mut eye = MaskBitmap::new(4, 1);
        eye.paint(Vec2::new(3.5, 0.5), 0.6, true);
        let optional = [OptionalMask::new(1, "Left Eye", Rgb::WHITE).with_data(eye)];

        let particles = extract(
            &ExtractionInput::new(&image, &config)
                .with_mask(&interaction)
                .with_optional_masks(&optional),
        );
        let masked: Vec<bool> = particles.iter().map(|p| p.masked).collect();
        assert_eq!(masked, vec![true, false, false, false]);
        assert_eq!(particles[3].optional_mask_slugs, vec!["left-eye".to_string()]);
        assert!(particles[0].optional_mask_slugs.is_empty());
    }

    #[test]
    fn test_add_and_modify_edits() {
        let image = gradient(4, 4);
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 1;

        let mut edits = EditList::new();
        edits.add(Vec2::new(10.0, 10.0), Some(Rgb::new(9, 9, 9)), Some(5.0), vec!["extra".into()]);
        edits.add(Vec2::new(1.0, 1.0), None, None, vec![]);
        edits.modify(Vec2::new(0.0, 0.0), 1.0, Some(Rgb::new(1, 2, 3)), Some(8.0));

        let particles = extract(&ExtractionInput::new(&image, &config).with_edits(&edits));
        assert_eq!(particles.len(), 18);

        let added = &particles[16];
        assert_eq!((added.x, added.y), (10.0, 10.0));
        assert_eq!(added.color, Rgb::new(9, 9, 9));
        assert_eq!(added.size, Some(5.0));
        assert_eq!(added.optional_mask_slugs, vec!["extra".to_string()]);

        // No color on the edit: sample the image under it.
        assert_eq!(particles[17].color, Rgb::new(10, 10, 0));

        assert_eq!(particles[0].color, Rgb::new(1, 2, 3));
        assert_eq!(particles[0].size, Some(8.0));
        assert_eq!(particles[1].size, None);
    }

    #[test]
    fn test_delete_applies_to_added_particles() {
        let image = gradient(4, 4);
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 1;

        let mut edits = EditList::new();
        edits.add(Vec2::new(20.0, 20.0), None, None, vec![]);
        edits.delete(Vec2::new(20.5, 20.0), 1.0);

        let particles = extract(&ExtractionInput::new(&image, &config).with_edits(&edits));
        assert_eq!(particles.len(), 16);
    }

    #[test]
    fn test_add_outside_image_is_white_and_unmasked() {
        let image = ImageBuffer::filled(4, 4, [10, 20, 30, 255]).unwrap();
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 1;
        let mut mask = MaskBitmap::new(4, 4);
        mask.invert();

        let mut edits = EditList::new();
        edits.add(Vec2::new(-5.0, -5.0), None, None, vec![]);
        edits.add(Vec2::new(4.0, 1.0), None, None, vec![]);
        edits.add(Vec2::new(1.0, 9.5), None, None, vec![]);
        edits.add(Vec2::new(3.6, 3.6), None, None, vec![]);

        let particles = extract(&ExtractionInput::new(&image, &config).with_mask(&mask).with_edits(&edits));
        assert_eq!(particles.len(), 20);
        for outside in &particles[16..19] {
            assert_eq!(outside.color, Rgb::WHITE, "({}, {})", outside.x, outside.y);
            assert!(!outside.masked, "({}, {})", outside.x, outside.y);
        }

        // Inside but rounding past the edge: the last pixel is used.
        let edge = &particles[19];
        assert_eq!(edge.color, Rgb::new(10, 20, 30));
        assert!(edge.masked);
    }

    #[test]
    fn test_extraction_bound() {
        assert_eq!(extraction_bound(4, 4, 1), 16);
        assert_eq!(extraction_bound(10, 7, 3), 4 * 3);
        assert_eq!(extraction_bound(10, 7, 0), 70);
    }
}
