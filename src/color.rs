//! Color utilities.
//!
//! Pure functions over 8-bit RGB colors: parsing, HSL conversion, the
//! per-pixel color filters used during extraction, palette lookup, and the
//! velocity-driven color shift applied at render time.
//!
//! Nothing here fails. Unparseable input falls back to white so a bad
//! color never stops an animation frame.

use crate::ConfigEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque 8-bit RGB color.
///
/// Serializes as a `#rrggbb` string and accepts anything [`Rgb::parse`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from float channels, rounding and clamping each to [0, 255].
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        Self::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }

    /// Parse `rgb(r, g, b)`, `#rrggbb` or `#rgb`. Anything else yields white.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or(Self::WHITE)
    }

    /// Strict variant of [`Rgb::parse`].
    pub fn try_parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let inner = s
            .strip_prefix("rgb(")
            .or_else(|| s.strip_prefix("rgba("))?
            .strip_suffix(')')?;
        let mut parts = inner.split(',').map(|p| p.trim().parse::<f32>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        Some(Self::from_f32(r, g, b))
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Perceived luminance with the grayscale weights.
    pub fn luma(&self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> String {
        c.to_hex()
    }
}

impl From<String> for Rgb {
    fn from(s: String) -> Rgb {
        Rgb::parse(&s)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    match hex.len() {
        6 => {
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
        }
        3 => Some(Rgb::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        _ => None,
    }
}

#[inline]
fn clamp_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Convenience wrapper matching the string-based call sites of the editor.
pub fn parse_color_to_rgb(color: &str) -> (u8, u8, u8) {
    let c = Rgb::parse(color);
    (c.r, c.g, c.b)
}

// ========== HSL ==========

/// Convert to HSL with every component in [0, 1].
pub fn rgb_to_hsl(c: Rgb) -> (f32, f32, f32) {
    let r = c.r as f32 / 255.0;
    let g = c.g as f32 / 255.0;
    let b = c.b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h / 6.0, s, l)
}

/// Inverse of [`rgb_to_hsl`]. Hue wraps; saturation and lightness are clamped.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        let v = l * 255.0;
        return Rgb::from_f32(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::from_f32(
        hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_channel(p, q, h) * 255.0,
        hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

// ========== Filters ==========

/// Per-pixel color filter applied during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ConfigEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ColorFilter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Saturate,
    Desaturate,
    Warm,
    Cool,
    Vintage,
}

fn sepia(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    (
        0.393 * r + 0.769 * g + 0.189 * b,
        0.349 * r + 0.686 * g + 0.168 * b,
        0.272 * r + 0.534 * g + 0.131 * b,
    )
}

/// Apply `filter` to a pixel. Every output channel is clamped to [0, 255].
pub fn apply_color_filter(c: Rgb, filter: ColorFilter) -> Rgb {
    let (r, g, b) = (c.r as f32, c.g as f32, c.b as f32);
    let luma = c.luma();
    match filter {
        ColorFilter::None => c,
        ColorFilter::Grayscale => Rgb::from_f32(luma, luma, luma),
        ColorFilter::Sepia => {
            let (r, g, b) = sepia(r, g, b);
            Rgb::from_f32(r, g, b)
        }
        ColorFilter::Invert => Rgb::new(255 - c.r, 255 - c.g, 255 - c.b),
        ColorFilter::Saturate => Rgb::from_f32(
            luma + (r - luma) * 1.5,
            luma + (g - luma) * 1.5,
            luma + (b - luma) * 1.5,
        ),
        ColorFilter::Desaturate => Rgb::from_f32(
            luma + (r - luma) * 0.5,
            luma + (g - luma) * 0.5,
            luma + (b - luma) * 0.5,
        ),
        ColorFilter::Warm => Rgb::from_f32(r + 20.0, g, b - 20.0),
        ColorFilter::Cool => Rgb::from_f32(r - 20.0, g, b + 20.0),
        ColorFilter::Vintage => {
            // Sepia is clamped before the bias, like two chained filters.
            let (r, g, b) = sepia(r, g, b);
            let base = Rgb::from_f32(r, g, b);
            Rgb::from_f32(base.r as f32 + 10.0, base.g as f32, base.b as f32 - 15.0)
        }
    }
}

// ========== Palettes ==========

/// Squared Euclidean distance in RGB space.
#[inline]
pub fn color_distance_sq(a: Rgb, b: Rgb) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Nearest palette entry; ties keep the earliest entry. Empty palette returns `color`.
pub fn nearest_color(palette: &[Rgb], color: Rgb) -> Rgb {
    let mut best = match palette.first() {
        Some(c) => *c,
        None => return color,
    };
    let mut best_dist = color_distance_sq(best, color);

    for &candidate in palette.iter().skip(1) {
        let dist = color_distance_sq(candidate, color);
        if dist < best_dist {
            best_dist = dist;
            best = candidate;
        }
    }

    best
}

// ========== Velocity color ==========

/// How a moving particle's display color departs from its base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ConfigEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VelocityColorMode {
    /// Lerp toward the target color.
    #[default]
    Brighten,
    /// Subtract from every channel.
    Darken,
    /// Rotate the hue.
    HueShift,
    /// Push saturation up.
    Saturation,
    /// Accumulate a per-particle hue rotation.
    Rainbow,
}

/// Speed-times-intensity to shift factor.
pub const VELOCITY_FACTOR_SCALE: f32 = 10.0;
/// Upper bound of the shift factor.
pub const VELOCITY_FACTOR_MAX: f32 = 100.0;
/// Hue or saturation change per unit of factor.
pub const HSL_SHIFT_PER_FACTOR: f32 = 0.01;
/// Rainbow hue advance per unit of speed-times-intensity.
pub const RAINBOW_RATE: f32 = 0.02;

/// Shift `color` according to `velocity` (speed, in pixels per frame).
///
/// `hue_offset` is the particle's own rainbow accumulator; only
/// [`VelocityColorMode::Rainbow`] reads or writes it.
pub fn shift_color_by_velocity(
    color: Rgb,
    velocity: f32,
    intensity: f32,
    mode: VelocityColorMode,
    target: Rgb,
    hue_offset: &mut f32,
) -> Rgb {
    let factor = (velocity * intensity * VELOCITY_FACTOR_SCALE).min(VELOCITY_FACTOR_MAX);

    match mode {
        VelocityColorMode::Brighten => {
            let t = factor / VELOCITY_FACTOR_MAX;
            Rgb::from_f32(
                color.r as f32 + (target.r as f32 - color.r as f32) * t,
                color.g as f32 + (target.g as f32 - color.g as f32) * t,
                color.b as f32 + (target.b as f32 - color.b as f32) * t,
            )
        }
        VelocityColorMode::Darken => Rgb::from_f32(
            (color.r as f32 - factor).max(0.0),
            (color.g as f32 - factor).max(0.0),
            (color.b as f32 - factor).max(0.0),
        ),
        VelocityColorMode::HueShift => {
            let (h, s, l) = rgb_to_hsl(color);
            hsl_to_rgb((h + factor * HSL_SHIFT_PER_FACTOR).rem_euclid(1.0), s, l)
        }
        VelocityColorMode::Saturation => {
            let (h, s, l) = rgb_to_hsl(color);
            hsl_to_rgb(h, (s + factor * HSL_SHIFT_PER_FACTOR).min(1.0), l)
        }
        VelocityColorMode::Rainbow => {
            *hue_offset = (*hue_offset + velocity * intensity * RAINBOW_RATE).rem_euclid(1.0);
            let (h, s, l) = rgb_to_hsl(color);
            hsl_to_rgb(h + *hue_offset, s, l)
        }
    }
}

impl VelocityColorMode {
    /// Body of the exported `velocityColor` helper, after `speed` and
    /// `factor` are computed. Returns a CSS color string.
    pub fn to_js(&self) -> String {
        match self {
            VelocityColorMode::Brighten => format!(
                "  const t = factor / {VELOCITY_FACTOR_MAX:?};\n\
                 \x20 return rgbString(\n\
                 \x20   p.r + (VC_TARGET[0] - p.r) * t,\n\
                 \x20   p.g + (VC_TARGET[1] - p.g) * t,\n\
                 \x20   p.b + (VC_TARGET[2] - p.b) * t,\n\
                 \x20 );\n"
            ),
            VelocityColorMode::Darken => "  return rgbString(Math.max(p.r - factor, 0), Math.max(p.g - factor, 0), Math.max(p.b - factor, 0));\n".into(),
            VelocityColorMode::HueShift => format!(
                "  const [h, s, l] = rgbToHsl(p.r, p.g, p.b);\n\
                 \x20 return hslString(mod1(h + factor * {HSL_SHIFT_PER_FACTOR:?}), s, l);\n"
            ),
            VelocityColorMode::Saturation => format!(
                "  const [h, s, l] = rgbToHsl(p.r, p.g, p.b);\n\
                 \x20 return hslString(h, Math.min(s + factor * {HSL_SHIFT_PER_FACTOR:?}, 1), l);\n"
            ),
            VelocityColorMode::Rainbow => format!(
                "  p.hueOffset = mod1(p.hueOffset + speed * VC_INTENSITY * {RAINBOW_RATE:?});\n\
                 \x20 const [h, s, l] = rgbToHsl(p.r, p.g, p.b);\n\
                 \x20 return hslString(h + p.hueOffset, s, l);\n"
            ),
        }
    }

    /// Whether the exported helper needs the HSL conversions in [`COLOR_JS`].
    pub fn uses_hsl(&self) -> bool {
        !matches!(self, VelocityColorMode::Brighten | VelocityColorMode::Darken)
    }
}

/// JavaScript channel clamping, mirroring [`Rgb::from_f32`].
pub const RGB_STRING_JS: &str = r#"
function rgbString(r: number, g: number, b: number): string {
  const c = (v: number) => (Number.isNaN(v) ? 0 : Math.min(255, Math.max(0, Math.round(v))));
  return `rgb(${c(r)}, ${c(g)}, ${c(b)})`;
}
"#;

/// JavaScript for [`rgb_to_hsl`] and [`hsl_to_rgb`].
pub const COLOR_JS: &str = r#"
function mod1(v: number): number {
  return ((v % 1) + 1) % 1;
}

function rgbToHsl(r: number, g: number, b: number): [number, number, number] {
  r /= 255;
  g /= 255;
  b /= 255;
  const max = Math.max(r, g, b);
  const min = Math.min(r, g, b);
  const l = (max + min) / 2;
  if (max === min) return [0, 0, l];
  const d = max - min;
  const s = l > 0.5 ? d / (2 - max - min) : d / (max + min);
  let h: number;
  if (max === r) h = (g - b) / d + (g < b ? 6 : 0);
  else if (max === g) h = (b - r) / d + 2;
  else h = (r - g) / d + 4;
  return [h / 6, s, l];
}

function hueToChannel(p: number, q: number, t: number): number {
  t = mod1(t);
  if (t < 1 / 6) return p + (q - p) * 6 * t;
  if (t < 1 / 2) return q;
  if (t < 2 / 3) return p + (q - p) * (2 / 3 - t) * 6;
  return p;
}

function hslString(h: number, s: number, l: number): string {
  h = mod1(h);
  s = Math.min(1, Math.max(0, s));
  l = Math.min(1, Math.max(0, l));
  if (s === 0) return rgbString(l * 255, l * 255, l * 255);
  const q = l < 0.5 ? l * (1 + s) : l + s - l * s;
  const p = 2 * l - q;
  return rgbString(
    hueToChannel(p, q, h + 1 / 3) * 255,
    hueToChannel(p, q, h) * 255,
    hueToChannel(p, q, h - 1 / 3) * 255,
  );
}
"#;
