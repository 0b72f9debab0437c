use std::fmt;

/// Saturation shared by every marker colour, in percent.
pub const MARKER_SATURATION: u8 = 70;
/// Lightness shared by every marker colour, in percent.
pub const MARKER_LIGHTNESS: u8 = 50;

/// A CSS `hsl()` colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HslColor {
    /// Degrees, `0..360`.
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Classic 31-multiplier string hash over UTF-16 code units, wrapping at
/// signed 32 bits.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Stable colour for an entity id. Same id, same colour, every time.
pub fn color_of(id: &str) -> HslColor {
    HslColor {
        hue: string_hash(id).rem_euclid(360) as u16,
        saturation: MARKER_SATURATION,
        lightness: MARKER_LIGHTNESS,
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerStyle {
    pub color: HslColor,
    pub radius_px: f32,
    pub fill_opacity: f32,
    pub stroke_width_px: f32,
}

impl MarkerStyle {
    pub const fn new(color: HslColor) -> Self {
        Self {
            color,
            radius_px: 6.0,
            fill_opacity: 0.85,
            stroke_width_px: 1.0,
        }
    }
}
