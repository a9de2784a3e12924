//! Continuous RGB color for intermediate arithmetic.

use std::ops::{Add, AddAssign, Div, Mul, Sub};

use super::{Rgb, LUMA_WEIGHTS};

/// An RGB color with unbounded `f32` channels on the 0..=255 scale.
///
/// Intermediate values may leave the displayable range; [`RgbF::to_rgb`]
/// rounds and clamps once, at the end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RgbF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbF {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// All three channels set to `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Apply `f` to each channel.
    #[inline]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Weighted luma (0.299 R + 0.587 G + 0.114 B).
    ///
    /// Evaluated relative to the red channel so that a grey input returns its
    /// own value bit-for-bit.
    #[inline]
    pub fn luma(self) -> f32 {
        self.r + LUMA_WEIGHTS[1] * (self.g - self.r) + LUMA_WEIGHTS[2] * (self.b - self.r)
    }

    /// Unweighted channel mean.
    #[inline]
    pub fn mean_luminance(self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }

    #[inline]
    pub fn distance_sq(self, other: RgbF) -> f32 {
        let d = self - other;
        d.r * d.r + d.g * d.g + d.b * d.b
    }

    /// Largest absolute per-channel difference.
    #[inline]
    pub fn max_channel_delta(self, other: RgbF) -> f32 {
        let d = self - other;
        d.r.abs().max(d.g.abs()).max(d.b.abs())
    }

    /// Round to the nearest integer and clamp each channel to 0..=255.
    #[inline]
    pub fn to_rgb(self) -> Rgb {
        Rgb::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

#[inline]
fn channel(v: f32) -> u8 {
    // NaN saturates to 0 through the `as` cast.
    v.round().clamp(0.0, 255.0) as u8
}

impl From<Rgb> for RgbF {
    #[inline]
    fn from(c: Rgb) -> Self {
        Self::new(c.r as f32, c.g as f32, c.b as f32)
    }
}

impl Add for RgbF {
    type Output = Self;
    #[inline]
    fn add(self, o: Self) -> Self {
        Self::new(self.r + o.r, self.g + o.g, self.b + o.b)
    }
}

impl AddAssign for RgbF {
    #[inline]
    fn add_assign(&mut self, o: Self) {
        *self = *self + o;
    }
}

impl Sub for RgbF {
    type Output = Self;
    #[inline]
    fn sub(self, o: Self) -> Self {
        Self::new(self.r - o.r, self.g - o.g, self.b - o.b)
    }
}

impl Mul<f32> for RgbF {
    type Output = Self;
    #[inline]
    fn mul(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s)
    }
}

impl Div<f32> for RgbF {
    type Output = Self;
    #[inline]
    fn div(self, s: f32) -> Self {
        Self::new(self.r / s, self.g / s, self.b / s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rgb_rounds_and_clamps() {
        assert_eq!(RgbF::new(-12.0, 127.5, 300.0).to_rgb(), Rgb::new(0, 128, 255));
        assert_eq!(RgbF::new(0.49, 254.5, 254.49).to_rgb(), Rgb::new(0, 255, 254));
        assert_eq!(RgbF::splat(f32::NAN).to_rgb(), Rgb::BLACK);
    }

    #[test]
    fn test_luma_weights_sum_to_one() {
        let white = RgbF::splat(255.0);
        assert!((white.luma() - 255.0).abs() < 1e-3);
        assert!((RgbF::new(100.0, 0.0, 0.0).luma() - 29.9).abs() < 1e-4);
        for v in [0.0, 37.5, 128.0, 178.0, 300.0] {
            assert_eq!(RgbF::splat(v).luma(), v);
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = RgbF::new(10.0, 20.0, 30.0);
        let b = RgbF::new(1.0, 2.0, 3.0);
        assert_eq!(a + b, RgbF::new(11.0, 22.0, 33.0));
        assert_eq!(a - b, RgbF::new(9.0, 18.0, 27.0));
        assert_eq!(b * 2.0, RgbF::new(2.0, 4.0, 6.0));
        assert_eq!(a / 10.0, RgbF::new(1.0, 2.0, 3.0));
        assert_eq!(a.max_channel_delta(b), 27.0);
    }
}
