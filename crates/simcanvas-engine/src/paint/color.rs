/// Premultiplied RGBA color with channels in `[0, 1]`.
///
/// Invariant:
/// - `rgb` components are already multiplied by `a`.
///
/// Canvas bitmaps store straight-alpha sRGB bytes; convert at the boundary with
/// [`Color::from_srgb_u8`] / [`Color::to_srgb_u8`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    /// Canvas default for both stroke and fill style.
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Straight-alpha sRGB bytes, rounded to nearest.
    #[inline]
    pub fn to_srgb_u8(self) -> [u8; 4] {
        let (r, g, b, a) = self.to_straight();
        [to_byte(r), to_byte(g), to_byte(b), to_byte(a)]
    }

    /// Scales every channel by `coverage`, the fraction of a pixel the shape covers.
    #[inline]
    pub fn with_coverage(self, coverage: f32) -> Self {
        let c = coverage.clamp(0.0, 1.0);
        Self { r: self.r * c, g: self.g * c, b: self.b * c, a: self.a * c }
    }

    /// Porter-Duff source-over: `self` drawn on top of `dst`.
    #[inline]
    pub fn over(self, dst: Color) -> Color {
        let k = 1.0 - self.a;
        Color {
            r: self.r + dst.r * k,
            g: self.g + dst.g * k,
            b: self.b + dst.b * k,
            a: self.a + dst.a * k,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_bytes_survive_premultiplication() {
        let c = Color::from_srgb_u8(170, 0, 0, 255);
        assert_eq!(c.to_srgb_u8(), [170, 0, 0, 255]);

        let half = Color::from_srgb_u8(255, 128, 0, 128);
        let [r, g, b, a] = half.to_srgb_u8();
        assert_eq!((r, b, a), (255, 0, 128));
        assert!((g as i32 - 128).abs() <= 1);
    }

    #[test]
    fn over_opaque_source_replaces_destination() {
        let red = Color::from_srgb_u8(255, 0, 0, 255);
        let blue = Color::from_srgb_u8(0, 0, 255, 255);
        assert_eq!(red.over(blue), red);
    }

    #[test]
    fn over_transparent_source_keeps_destination() {
        let blue = Color::from_srgb_u8(0, 0, 255, 255);
        assert_eq!(Color::transparent().over(blue), blue);
    }

    #[test]
    fn coverage_scales_alpha() {
        let c = Color::BLACK.with_coverage(0.25);
        assert_eq!(c.a, 0.25);
    }
}
