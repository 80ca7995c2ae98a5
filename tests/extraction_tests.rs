//! End-to-end extraction tests: the fixed scenarios plus property tests
//! for determinism, the sampling bound and delete zones.

use particula::color::{hsl_to_rgb, rgb_to_hsl, Rgb};
use particula::extract::{extract, extraction_bound};
use particula::quantize::{kmeans, quantize_colors};
use particula::{EditList, ExtractionInput, ImageBuffer, MaskBitmap, OptionalMask, ParticleConfig, Scene, Vec2};
use proptest::prelude::*;

/// A 4x4 opaque image where pixel (x, y) is `(x * 60, y * 60, x + y)`.
fn four_by_four() -> ImageBuffer {
    let mut pixels = Vec::new();
    for y in 0..4u8 {
        for x in 0..4u8 {
            pixels.extend_from_slice(&[x * 60, y * 60, x + y, 255]);
        }
    }
    ImageBuffer::from_rgba(4, 4, pixels).unwrap()
}

fn per_pixel_config() -> ParticleConfig {
    let mut config = ParticleConfig::default();
    config.sampling.resolution = 1;
    config.sampling.alpha_threshold = 0;
    config.sampling.max_particles = 100;
    config
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_one_particle_per_pixel() {
    let image = four_by_four();
    let config = per_pixel_config();
    let particles = extract(&ExtractionInput::new(&image, &config));

    assert_eq!(particles.len(), 16);
    for (i, p) in particles.iter().enumerate() {
        let (x, y) = ((i % 4) as u8, (i / 4) as u8);
        assert_eq!((p.x, p.y), (x as f32, y as f32));
        assert_eq!(p.color, Rgb::new(x * 60, y * 60, x + y));
        assert!(!p.masked);
    }
}

#[test]
fn scenario_b_delete_edit_removes_one_cell() {
    let image = four_by_four();
    let config = per_pixel_config();
    let mut edits = EditList::new();
    edits.delete(Vec2::new(2.0, 2.0), 1.0);

    let particles = extract(&ExtractionInput::new(&image, &config).with_edits(&edits));
    assert_eq!(particles.len(), 15);
    assert!(!particles.iter().any(|p| (p.x, p.y) == (2.0, 2.0)));
    // Neighbors at exactly the radius survive.
    for neighbor in [(1.0, 2.0), (3.0, 2.0), (2.0, 1.0), (2.0, 3.0)] {
        assert!(particles.iter().any(|p| (p.x, p.y) == neighbor), "{neighbor:?}");
    }
}

#[test]
fn scenario_c_evenly_strided_cap() {
    let image = four_by_four();
    let mut config = per_pixel_config();
    config.sampling.max_particles = 5;

    let particles = extract(&ExtractionInput::new(&image, &config));
    let positions: Vec<(f32, f32)> = particles.iter().map(|p| (p.x, p.y)).collect();
    // Raw indices 0, 3, 6, 9, 12 in raster order.
    assert_eq!(positions, vec![(0.0, 0.0), (3.0, 0.0), (2.0, 1.0), (1.0, 2.0), (0.0, 3.0)]);
}

#[test]
fn test_fully_transparent_image_yields_nothing() {
    let image = ImageBuffer::filled(8, 8, [255, 255, 255, 0]).unwrap();
    let particles = extract(&ExtractionInput::new(&image, &ParticleConfig::default()));
    assert!(particles.is_empty());
}

#[test]
fn test_scene_carries_image_size_and_groups() {
    let image = four_by_four();
    let config = per_pixel_config();
    let mut data = MaskBitmap::new(4, 4);
    data.paint(Vec2::new(0.5, 0.5), 0.6, true);
    let masks = [OptionalMask::new(3, "Top Left", Rgb::WHITE).with_data(data)];

    let scene = Scene::extract(&ExtractionInput::new(&image, &config).with_optional_masks(&masks));
    assert_eq!((scene.width, scene.height), (4, 4));
    assert_eq!(scene.mask_groups()["top-left"], vec![0]);
}

#[test]
fn test_masks_smaller_than_image_read_unmasked_outside() {
    let image = four_by_four();
    let config = per_pixel_config();

    // 2x2 masks covering only the top-left quarter, fully painted.
    let mut interaction = MaskBitmap::new(2, 2);
    interaction.invert();
    let mut corner = MaskBitmap::new(2, 2);
    corner.invert();
    let masks = [OptionalMask::new(1, "Corner", Rgb::WHITE).with_data(corner)];

    let particles = extract(
        &ExtractionInput::new(&image, &config)
            .with_mask(&interaction)
            .with_optional_masks(&masks),
    );
    assert_eq!(particles.len(), 16);
    for p in &particles {
        let inside = p.x < 2.0 && p.y < 2.0;
        assert_eq!(p.masked, inside, "({}, {})", p.x, p.y);
        assert_eq!(p.optional_mask_slugs.is_empty(), !inside, "({}, {})", p.x, p.y);
    }
}

// ============================================================================
// Properties
// ============================================================================

fn arb_image() -> impl Strategy<Value = ImageBuffer> {
    (1u32..24, 1u32..24).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h * 4) as usize)
            .prop_map(move |pixels| ImageBuffer::from_rgba(w, h, pixels).unwrap())
    })
}

fn arb_config() -> impl Strategy<Value = ParticleConfig> {
    (0u32..6, any::<u8>(), 1usize..400, any::<bool>(), any::<u64>()).prop_map(
        |(resolution, alpha, max, clustering, seed)| {
            let mut config = ParticleConfig::default();
            config.sampling.resolution = resolution;
            config.sampling.alpha_threshold = alpha;
            config.sampling.max_particles = max;
            config.sampling.color_clustering = clustering;
            config.sampling.cluster_count = 4;
            config.sampling.seed = seed;
            config
        },
    )
}

proptest! {
    #[test]
    fn prop_extraction_is_deterministic(image in arb_image(), config in arb_config()) {
        let a = extract(&ExtractionInput::new(&image, &config));
        let b = extract(&ExtractionInput::new(&image, &config));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_sampling_bound(image in arb_image(), mut config in arb_config()) {
        let bound = extraction_bound(image.width(), image.height(), config.sampling.gap());

        config.sampling.max_particles = usize::MAX;
        let uncapped = extract(&ExtractionInput::new(&image, &config));
        prop_assert!(uncapped.len() <= bound);

        config.sampling.max_particles = bound / 2;
        let capped = extract(&ExtractionInput::new(&image, &config));
        prop_assert!(capped.len() <= bound / 2);
    }

    #[test]
    fn prop_delete_zone_excludes_particles(
        image in arb_image(),
        cx in -4.0f32..28.0,
        cy in -4.0f32..28.0,
        radius in 0.0f32..12.0,
        adds in prop::collection::vec((0.0f32..24.0, 0.0f32..24.0), 0..8),
    ) {
        let mut config = ParticleConfig::default();
        config.sampling.resolution = 1;
        config.sampling.alpha_threshold = 0;
        config.sampling.max_particles = usize::MAX;

        let center = Vec2::new(cx, cy);
        let mut edits = EditList::new();
        for (x, y) in adds {
            edits.add(Vec2::new(x, y), None, None, Vec::new());
        }
        edits.delete(center, radius);

        let particles = extract(&ExtractionInput::new(&image, &config).with_edits(&edits));
        for p in &particles {
            prop_assert!(p.position().distance(center) >= radius);
        }
    }

    #[test]
    fn prop_hsl_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let c = Rgb::new(r, g, b);
        let (h, s, l) = rgb_to_hsl(c);
        let back = hsl_to_rgb(h, s, l);
        prop_assert!((back.r as i16 - r as i16).abs() <= 1);
        prop_assert!((back.g as i16 - g as i16).abs() <= 1);
        prop_assert!((back.b as i16 - b as i16).abs() <= 1);
    }

    #[test]
    fn prop_quantizer_returns_k_colors(
        samples in prop::collection::vec(any::<(u8, u8, u8)>(), 0..200),
        k in 0usize..12,
    ) {
        let samples: Vec<Rgb> = samples.into_iter().map(|(r, g, b)| Rgb::new(r, g, b)).collect();
        let palette = kmeans(&samples, k);
        if samples.is_empty() || k == 0 {
            prop_assert_eq!(palette, vec![Rgb::WHITE]);
        } else {
            prop_assert_eq!(palette.len(), k);
        }
    }
}

#[test]
fn test_quantized_palette_parses_back() {
    let image = four_by_four();
    for color in quantize_colors(&image, 3) {
        assert_eq!(Rgb::try_parse(&color.to_hex()), Some(color));
        assert_eq!(Rgb::parse(&color.to_string()), color);
    }
}
