//! Hashed-sine pseudo noise for idle animation.
//!
//! Not gradient noise and not random in any useful sense: a classic
//! `fract(sin(dot) * 43758.5453)` hash, summed over three taps for visual
//! smoothness. [`NOISE_JS`] is the same function for exported components.
//!
//! All arithmetic runs in `f64` so the live preview and the exported
//! JavaScript agree on the hash for the same inputs.

/// Base spatial frequency of the first tap.
pub const BASE_FREQUENCY: f64 = 0.01;

/// `(weight, spatial multiplier, temporal multiplier)` per tap.
pub const TAPS: [(f64, f64, f64); 3] = [(0.5, 1.0, 1.0), (0.3, 2.0, 1.5), (0.2, 4.0, 2.0)];

/// Pseudo-random value in [-1, 1) for a point in space-time.
#[inline]
pub fn hash(x: f64, y: f64, t: f64) -> f64 {
    let v = (x * 12.9898 + y * 78.233 + t * 37.719).sin() * 43758.5453;
    (v - v.floor()) * 2.0 - 1.0
}

/// Weighted three-tap noise at `(x, y)` and time `t`, in [-1, 1).
pub fn smooth_noise(x: f32, y: f32, t: f32) -> f32 {
    let (x, y, t) = (x as f64, y as f64, t as f64);
    TAPS.iter()
        .map(|&(weight, space, time)| {
            let f = BASE_FREQUENCY * space;
            weight * hash(x * f, y * f, t * time)
        })
        .sum::<f64>() as f32
}

/// JavaScript for [`hash`] and [`smooth_noise`].
pub const NOISE_JS: &str = r#"
function hashNoise(x: number, y: number, t: number): number {
  const v = Math.sin(x * 12.9898 + y * 78.233 + t * 37.719) * 43758.5453;
  return (v - Math.floor(v)) * 2 - 1;
}

function smoothNoise(x: number, y: number, t: number): number {
  return (
    0.5 * hashNoise(x * 0.01, y * 0.01, t) +
    0.3 * hashNoise(x * 0.02, y * 0.02, t * 1.5) +
    0.2 * hashNoise(x * 0.04, y * 0.04, t * 2)
  );
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_range() {
        for i in 0..1000 {
            let v = hash(i as f64 * 0.37, i as f64 * 1.3, i as f64 * 0.01);
            assert!((-1.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_smooth_noise_is_deterministic_and_bounded() {
        for i in 0..200 {
            let (x, y, t) = (i as f32 * 3.0, i as f32 * 7.0, i as f32 * 0.1);
            let a = smooth_noise(x, y, t);
            assert_eq!(a, smooth_noise(x, y, t));
            assert!((-1.0..1.0).contains(&a));
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = TAPS.iter().map(|t| t.0).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_noise_varies_over_time() {
        let samples: Vec<f32> = (0..10).map(|i| smooth_noise(50.0, 80.0, i as f32)).collect();
        assert!(samples.windows(2).any(|w| w[0] != w[1]));
    }
}
