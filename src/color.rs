//! Color type, color attribute parsing, and alpha compositing.
//!
//! Colors are stored with **straight** (non-premultiplied) alpha everywhere;
//! the blending routine converts to premultiplied form internally and back,
//! implementing the Porter-Duff "source over destination" operator.

use crate::basics::clamp_f64;

// ============================================================================
// Rgba
// ============================================================================

/// RGBA color with f64 components in range [0, 1], straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const BLACK: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    #[inline]
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn new_rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Copy of this color with its alpha scaled by `factor` (clamped to [0, 1]).
    #[inline]
    pub fn scaled_alpha(&self, factor: f64) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a: clamp_f64(self.a * factor, 0.0, 1.0),
        }
    }

    /// Porter-Duff "over": composite `src` (self) on top of `dst`.
    ///
    /// Both colors are straight alpha; the math runs premultiplied and the
    /// result is converted back to straight alpha.
    pub fn over(&self, dst: Rgba) -> Rgba {
        let sa = self.a;
        let da = dst.a;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 1e-6 {
            return Rgba::TRANSPARENT;
        }
        let inv = 1.0 - sa;
        Rgba {
            r: (self.r * sa + dst.r * da * inv) / out_a,
            g: (self.g * sa + dst.g * da * inv) / out_a,
            b: (self.b * sa + dst.b * da * inv) / out_a,
            a: out_a,
        }
    }
}

// ============================================================================
// Color attribute parsing
// ============================================================================

/// Result of parsing a `fill`/`stroke` attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSpec {
    /// `"none"` — paint disabled.
    NoPaint,
    /// `"inherit"`, or unrecognized text — use the nearest ancestor's value.
    Inherit,
    /// A concrete color.
    Color(Rgba),
}

/// Fixed named-color table (subset of the SVG keyword colors).
fn named_color(name: &str) -> Option<Rgba> {
    let c = match name {
        "black" => Rgba::new_rgb(0.0, 0.0, 0.0),
        "white" => Rgba::new_rgb(1.0, 1.0, 1.0),
        "red" => Rgba::new_rgb(1.0, 0.0, 0.0),
        "green" => Rgba::new_rgb(0.0, 0.5, 0.0),
        "blue" => Rgba::new_rgb(0.0, 0.0, 1.0),
        "yellow" => Rgba::new_rgb(1.0, 1.0, 0.0),
        "cyan" => Rgba::new_rgb(0.0, 1.0, 1.0),
        "magenta" => Rgba::new_rgb(1.0, 0.0, 1.0),
        "gray" | "grey" => Rgba::new_rgb(0.5, 0.5, 0.5),
        "orange" => Rgba::new_rgb(1.0, 0.647, 0.0),
        "purple" => Rgba::new_rgb(0.5, 0.0, 0.5),
        "pink" => Rgba::new_rgb(1.0, 0.753, 0.796),
        "transparent" => Rgba::TRANSPARENT,
        _ => return None,
    };
    Some(c)
}

fn hex_digit(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'a'..=b'f' => Some((b - b'a' + 10) as u32),
        b'A'..=b'F' => Some((b - b'A' + 10) as u32),
        _ => None,
    }
}

fn parse_hex(s: &str) -> Option<Rgba> {
    let digits = s.as_bytes();
    match digits.len() {
        // #RGB — each digit doubled (0xF -> 0xFF).
        3 => {
            let r = hex_digit(digits[0])?;
            let g = hex_digit(digits[1])?;
            let b = hex_digit(digits[2])?;
            Some(Rgba::new_rgb(
                (r * 17) as f64 / 255.0,
                (g * 17) as f64 / 255.0,
                (b * 17) as f64 / 255.0,
            ))
        }
        6 => {
            let r = hex_digit(digits[0])? * 16 + hex_digit(digits[1])?;
            let g = hex_digit(digits[2])? * 16 + hex_digit(digits[3])?;
            let b = hex_digit(digits[4])? * 16 + hex_digit(digits[5])?;
            Some(Rgba::new_rgb(
                r as f64 / 255.0,
                g as f64 / 255.0,
                b as f64 / 255.0,
            ))
        }
        _ => None,
    }
}

/// `rgb(r, g, b)` with 0-255 integer components.
fn parse_rgb_func(s: &str) -> Option<Rgba> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut comps = [0.0f64; 3];
    let mut n = 0;
    for part in inner.split(',') {
        if n >= 3 {
            return None;
        }
        let v: f64 = part.trim().parse().ok()?;
        comps[n] = clamp_f64(v, 0.0, 255.0) / 255.0;
        n += 1;
    }
    if n != 3 {
        return None;
    }
    Some(Rgba::new_rgb(comps[0], comps[1], comps[2]))
}

/// Parse a `fill`/`stroke` attribute value.
///
/// Accepted syntax: `none`, `inherit`, `#RGB`, `#RRGGBB`, `rgb(r,g,b)`, and
/// the fixed named-color table. Unrecognized text resolves to [`ColorSpec::Inherit`]
/// rather than an error, so imperfect artwork still renders.
pub fn parse_color(text: &str) -> ColorSpec {
    let text = text.trim();
    if text == "none" {
        return ColorSpec::NoPaint;
    }
    if text == "inherit" {
        return ColorSpec::Inherit;
    }
    if let Some(rest) = text.strip_prefix('#') {
        if let Some(c) = parse_hex(rest) {
            return ColorSpec::Color(c);
        }
        return ColorSpec::Inherit;
    }
    if text.starts_with("rgb(") {
        if let Some(c) = parse_rgb_func(text) {
            return ColorSpec::Color(c);
        }
        return ColorSpec::Inherit;
    }
    match named_color(text) {
        Some(c) => ColorSpec::Color(c),
        None => ColorSpec::Inherit,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgba_eq(c: Rgba, r: f64, g: f64, b: f64, a: f64) {
        assert!((c.r - r).abs() < 1e-9, "r: {} vs {}", c.r, r);
        assert!((c.g - g).abs() < 1e-9, "g: {} vs {}", c.g, g);
        assert!((c.b - b).abs() < 1e-9, "b: {} vs {}", c.b, b);
        assert!((c.a - a).abs() < 1e-9, "a: {} vs {}", c.a, a);
    }

    #[test]
    fn test_hex_long() {
        match parse_color("#FF0000") {
            ColorSpec::Color(c) => assert_rgba_eq(c, 1.0, 0.0, 0.0, 1.0),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_hex_short() {
        match parse_color("#0f8") {
            ColorSpec::Color(c) => {
                assert_rgba_eq(c, 0.0, 1.0, 136.0 / 255.0, 1.0);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rgb_func() {
        match parse_color("rgb(255, 128, 0)") {
            ColorSpec::Color(c) => {
                assert_rgba_eq(c, 1.0, 128.0 / 255.0, 0.0, 1.0);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_named_and_keywords() {
        assert_eq!(parse_color("none"), ColorSpec::NoPaint);
        assert_eq!(parse_color("inherit"), ColorSpec::Inherit);
        assert_eq!(parse_color("no-such-color"), ColorSpec::Inherit);
        match parse_color("blue") {
            ColorSpec::Color(c) => assert_rgba_eq(c, 0.0, 0.0, 1.0, 1.0),
            other => panic!("unexpected: {:?}", other),
        }
        match parse_color("transparent") {
            ColorSpec::Color(c) => assert_eq!(c.a, 0.0),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_over_half_alpha_red_on_blue() {
        // Spec compositing law: red at alpha 0.5 over opaque blue.
        let blue = Rgba::new_rgb(0.0, 0.0, 1.0);
        let red = Rgba::new(1.0, 0.0, 0.0, 0.5);
        let out = red.over(blue);
        assert_rgba_eq(out, 0.5, 0.0, 0.5, 1.0);
    }

    #[test]
    fn test_over_transparent_src_is_identity() {
        let dst = Rgba::new(0.2, 0.4, 0.6, 0.8);
        let out = Rgba::TRANSPARENT.over(dst);
        assert_rgba_eq(out, 0.2, 0.4, 0.6, 0.8);
    }

    #[test]
    fn test_over_both_transparent() {
        let out = Rgba::TRANSPARENT.over(Rgba::TRANSPARENT);
        assert_eq!(out, Rgba::TRANSPARENT);
    }
}
