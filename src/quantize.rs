//! K-means color quantization.
//!
//! Builds a fixed-size palette from an image so extraction can snap every
//! sampled color to its nearest cluster. Seeding is deterministic (the first
//! samples in raster order) so identical images always produce identical
//! palettes.

use crate::color::Rgb;
use crate::image_buffer::ImageBuffer;

/// Byte stride between sampled pixels (every 10th pixel).
const SAMPLE_STRIDE: usize = 40;
/// Minimum alpha for a pixel to take part in clustering.
const MIN_ALPHA: u8 = 128;
/// Fixed number of k-means iterations.
const ITERATIONS: usize = 10;

/// Collect the colors that take part in clustering.
fn sample_colors(pixels: &[u8]) -> Vec<Rgb> {
    pixels
        .chunks_exact(4)
        .step_by(SAMPLE_STRIDE / 4)
        .filter(|px| px[3] > MIN_ALPHA)
        .map(|px| Rgb::new(px[0], px[1], px[2]))
        .collect()
}

/// Index of the nearest centroid; ties keep the earliest.
fn nearest_centroid(centroids: &[[f32; 3]], c: Rgb) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let dr = c.r as f32 - centroid[0];
        let dg = c.g as f32 - centroid[1];
        let db = c.b as f32 - centroid[2];
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Quantize `image` into `cluster_count` colors.
///
/// Returns exactly `cluster_count` entries, or `[white]` when no pixel is
/// opaque enough to sample (or `cluster_count` is zero). When the image has
/// fewer qualifying samples than clusters, the last sample is reused as the
/// remaining seeds.
pub fn quantize_colors(image: &ImageBuffer, cluster_count: usize) -> Vec<Rgb> {
    let samples = sample_colors(image.pixels());
    kmeans(&samples, cluster_count)
}

/// Run the fixed-iteration k-means over pre-sampled colors.
pub fn kmeans(samples: &[Rgb], k: usize) -> Vec<Rgb> {
    let last = match samples.last() {
        Some(c) if k > 0 => *c,
        _ => return vec![Rgb::WHITE],
    };

    let mut centroids: Vec<[f32; 3]> = (0..k)
        .map(|i| {
            let c = samples.get(i).copied().unwrap_or(last);
            [c.r as f32, c.g as f32, c.b as f32]
        })
        .collect();

    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0u32; k];

    for _ in 0..ITERATIONS {
        sums.iter_mut().for_each(|s| *s = [0.0; 3]);
        counts.iter_mut().for_each(|c| *c = 0);

        for &sample in samples {
            let cluster = nearest_centroid(&centroids, sample);
            sums[cluster][0] += sample.r as f64;
            sums[cluster][1] += sample.g as f64;
            sums[cluster][2] += sample.b as f64;
            counts[cluster] += 1;
        }

        // Empty clusters keep their previous centroid.
        for (i, centroid) in centroids.iter_mut().enumerate() {
            if counts[i] > 0 {
                let n = counts[i] as f64;
                *centroid = [
                    (sums[i][0] / n) as f32,
                    (sums[i][1] / n) as f32,
                    (sums[i][2] / n) as f32,
                ];
            }
        }
    }

    log::debug!("quantized {} samples into {} clusters", samples.len(), k);

    centroids
        .iter()
        .map(|c| Rgb::from_f32(c[0], c[1], c[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_from_colors(colors: &[[u8; 4]], width: u32) -> ImageBuffer {
        let height = (colors.len() as u32).div_ceil(width);
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        for (i, c) in colors.iter().enumerate() {
            pixels[i * 4..i * 4 + 4].copy_from_slice(c);
        }
        ImageBuffer::from_rgba(width, height, pixels).unwrap()
    }

    #[test]
    fn test_transparent_image_falls_back_to_white() {
        let image = image_from_colors(&[[10, 20, 30, 0]; 100], 10);
        assert_eq!(quantize_colors(&image, 4), vec![Rgb::WHITE]);
    }

    #[test]
    fn test_zero_clusters_falls_back_to_white() {
        let image = image_from_colors(&[[10, 20, 30, 255]; 100], 10);
        assert_eq!(quantize_colors(&image, 0), vec![Rgb::WHITE]);
    }

    #[test]
    fn test_two_color_image_separates() {
        // 20 sampled pixels: alternating red and blue at the sampled positions.
        let mut colors = Vec::new();
        for i in 0..200 {
            let sampled_index = i / 10;
            if sampled_index % 2 == 0 {
                colors.push([250, 0, 0, 255]);
            } else {
                colors.push([0, 0, 250, 255]);
            }
        }
        let image = image_from_colors(&colors, 20);
        let palette = quantize_colors(&image, 2);
        assert_eq!(palette.len(), 2);
        assert!(palette.contains(&Rgb::new(250, 0, 0)));
        assert!(palette.contains(&Rgb::new(0, 0, 250)));
    }

    #[test]
    fn test_fewer_samples_than_clusters_still_returns_k() {
        let palette = kmeans(&[Rgb::new(1, 2, 3)], 5);
        assert_eq!(palette.len(), 5);
        assert!(palette.iter().all(|c| *c == Rgb::new(1, 2, 3)));
    }

    #[test]
    fn test_empty_cluster_keeps_seed() {
        // Duplicate seeds: the second centroid loses every tie on the first pass
        // and keeps its seed until the first centroid drifts away.
        let samples = [Rgb::new(9, 9, 9), Rgb::new(9, 9, 9), Rgb::new(200, 0, 0)];
        let palette = kmeans(&samples, 2);
        assert_eq!(palette, vec![Rgb::new(200, 0, 0), Rgb::new(9, 9, 9)]);
    }
}
