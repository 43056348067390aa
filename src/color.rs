//! Accent color parsing.
//!
//! Catalog colors are CSS-style hex strings. Unlike a renderer, which can
//! fall back to black on garbage input, the catalog is validated at boot,
//! so parsing here is strict and reports what was wrong.

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };
    /// Frame color used when a catalog record carries no color.
    pub const DEFAULT_ACCENT: Self = Self { r: 0x66, g: 0x66, b: 0x66, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to normalized f32 (for rendering)
    #[inline(always)]
    pub fn to_f32(self) -> [f32; 4] {
        const INV_255: f32 = 1.0 / 255.0;
        [
            self.r as f32 * INV_255,
            self.g as f32 * INV_255,
            self.b as f32 * INV_255,
            self.a as f32 * INV_255,
        ]
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Scale RGB by `k` (alpha untouched). Used for flat shading.
    pub fn shaded(self, k: f32) -> Self {
        let s = |c: u8| (c as f32 * k).round().clamp(0.0, 255.0) as u8;
        Self { r: s(self.r), g: s(self.g), b: s(self.b), a: self.a }
    }

    /// Blend `other` over `self` with weight `t` (0 = self, 1 = other).
    pub fn mix(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let m = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: m(self.r, other.r),
            g: m(self.g, other.g),
            b: m(self.b, other.b),
            a: m(self.a, other.a),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::DEFAULT_ACCENT
    }
}

/// Why a hex color string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 3, 4, 6 or 8 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digit {digit:?} in {text:?}")]
    BadDigit { text: String, digit: char },
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse CSS hex color string.
///
/// Supports: #RGB, #RGBA, #RRGGBB, #RRGGBBAA
pub fn parse_hex_color(s: &str) -> Result<Rgba, ColorError> {
    let text = s.trim();
    let digits = text
        .strip_prefix('#')
        .ok_or_else(|| ColorError::MissingHash(text.to_string()))?;

    let mut nibbles = Vec::with_capacity(8);
    for ch in digits.chars() {
        let v = u8::try_from(ch)
            .ok()
            .and_then(hex_digit)
            .ok_or_else(|| ColorError::BadDigit {
                text: text.to_string(),
                digit: ch,
            })?;
        nibbles.push(v);
    }

    let byte = |hi: u8, lo: u8| hi << 4 | lo;
    match nibbles.as_slice() {
        // #RGB → duplicate each: R→RR, G→GG, B→BB
        &[r, g, b] => Ok(Rgba::rgb(byte(r, r), byte(g, g), byte(b, b))),
        &[r, g, b, a] => Ok(Rgba {
            r: byte(r, r),
            g: byte(g, g),
            b: byte(b, b),
            a: byte(a, a),
        }),
        &[r1, r2, g1, g2, b1, b2] => Ok(Rgba::rgb(byte(r1, r2), byte(g1, g2), byte(b1, b2))),
        &[r1, r2, g1, g2, b1, b2, a1, a2] => Ok(Rgba {
            r: byte(r1, r2),
            g: byte(g1, g2),
            b: byte(b1, b2),
            a: byte(a1, a2),
        }),
        _ => Err(ColorError::BadLength(text.to_string())),
    }
}
