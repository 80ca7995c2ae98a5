//! Value parsers for command-line arguments.

use glam::Vec2;
use std::path::PathBuf;

/// Parse `x,y` into a pointer position.
pub fn parse_pointer(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let x: f32 = x.trim().parse().map_err(|_| format!("invalid x coordinate '{x}'"))?;
    let y: f32 = y.trim().parse().map_err(|_| format!("invalid y coordinate '{y}'"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("pointer must be finite, got '{s}'"));
    }
    Ok(Vec2::new(x, y))
}

/// Parse `name=path` for an optional mask.
pub fn parse_named_mask(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected name=path but got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pointer() {
        assert_eq!(parse_pointer("12.5, 40"), Ok(Vec2::new(12.5, 40.0)));
        assert!(parse_pointer("12").is_err());
        assert!(parse_pointer("a,1").is_err());
        assert!(parse_pointer("inf,1").is_err());
    }

    #[test]
    fn test_parse_named_mask() {
        assert_eq!(
            parse_named_mask("Logo Text=masks/text.png"),
            Ok(("Logo Text".to_string(), PathBuf::from("masks/text.png")))
        );
        assert!(parse_named_mask("=x.png").is_err());
        assert!(parse_named_mask("name=").is_err());
        assert!(parse_named_mask("no-separator").is_err());
    }
}
