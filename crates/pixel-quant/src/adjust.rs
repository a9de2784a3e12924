//! Per-pixel exposure, contrast and chrominance adjustment.
//!
//! The three transforms run in a fixed order on unclamped `f32` channels and
//! are clamped once at the end:
//!
//! ```text
//! v += exposure * 5
//! v  = (v - 128) * (contrast + 10) / 10 + 128
//! v  = L + (v - L) * (chrominance + 10) / 10     L = 0.299 R + 0.587 G + 0.114 B
//! v  = clamp(round(v), 0, 255)
//! ```
//!
//! Intermediate overflow is intentional: a channel pushed past 255 by
//! exposure still pulls the luma used by the chrominance step.

use crate::color::{Rgb, RgbF};
use crate::error::Error;
use crate::raster::Raster;

/// Lower bound for every adjustment parameter.
pub const MIN_ADJUSTMENT: i8 = -10;
/// Upper bound for every adjustment parameter.
pub const MAX_ADJUSTMENT: i8 = 10;

const EXPOSURE_STEP: f32 = 5.0;
const MIDPOINT: f32 = 128.0;

/// The four user-facing adjustment parameters, each in `-10..=10`.
///
/// Zero is neutral for every field. `dithering` does not touch pixels here;
/// it selects the quantization strategy through [`Adjustments::quantize_mode`].
///
/// # Example
///
/// ```
/// use pixel_quant::{Adjustments, QuantizeMode};
///
/// let adj = Adjustments::new(2, 0, -3, -5).unwrap();
/// assert_eq!(adj.quantize_mode(), QuantizeMode::Dither { strength: 0.5 });
/// assert!(Adjustments::new(0, 11, 0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Adjustments {
    exposure: i8,
    contrast: i8,
    chrominance: i8,
    dithering: i8,
}

impl Adjustments {
    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAdjustment`] naming the first out-of-range field.
    pub fn new(exposure: i32, contrast: i32, chrominance: i32, dithering: i32) -> Result<Self, Error> {
        Ok(Self {
            exposure: check("exposure", exposure)?,
            contrast: check("contrast", contrast)?,
            chrominance: check("chrominance", chrominance)?,
            dithering: check("dithering", dithering)?,
        })
    }

    #[inline]
    pub fn exposure(&self) -> i8 {
        self.exposure
    }

    #[inline]
    pub fn contrast(&self) -> i8 {
        self.contrast
    }

    #[inline]
    pub fn chrominance(&self) -> i8 {
        self.chrominance
    }

    #[inline]
    pub fn dithering(&self) -> i8 {
        self.dithering
    }

    /// True when exposure, contrast and chrominance are all neutral.
    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.exposure == 0 && self.contrast == 0 && self.chrominance == 0
    }

    /// Pick direct mapping or error diffusion from the dithering field.
    ///
    /// Only the magnitude matters: `-4` and `4` both diffuse 40% of the error.
    pub fn quantize_mode(&self) -> QuantizeMode {
        match self.dithering {
            0 => QuantizeMode::Nearest,
            d => QuantizeMode::Dither {
                strength: d.unsigned_abs() as f32 / MAX_ADJUSTMENT as f32,
            },
        }
    }
}

fn check(name: &'static str, value: i32) -> Result<i8, Error> {
    if (MIN_ADJUSTMENT as i32..=MAX_ADJUSTMENT as i32).contains(&value) {
        Ok(value as i8)
    } else {
        Err(Error::InvalidAdjustment { name, value })
    }
}

/// How the adjusted raster is reduced to palette colors.
///
/// Exactly one strategy runs per pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantizeMode {
    /// Replace every pixel with its nearest palette entry.
    Nearest,
    /// Floyd-Steinberg error diffusion; `strength` in `(0, 1]` scales the
    /// error pushed to neighbours.
    Dither { strength: f32 },
}

/// Apply the adjustment chain to one pixel, returning unclamped channels.
///
/// Exposed so tests and callers can observe pre-clamp values.
#[inline]
pub fn adjust_unclamped(color: Rgb, adj: &Adjustments) -> RgbF {
    let exposed = RgbF::from(color) + RgbF::splat(adj.exposure as f32 * EXPOSURE_STEP);

    let contrast = (adj.contrast as f32 + 10.0) / 10.0;
    let contrasted = exposed.map(|v| (v - MIDPOINT) * contrast + MIDPOINT);

    let luma = contrasted.luma();
    let saturation = (adj.chrominance as f32 + 10.0) / 10.0;
    contrasted.map(|v| luma + (v - luma) * saturation)
}

/// Apply the adjustment chain to one pixel and clamp to 8 bits.
#[inline]
pub fn adjust_pixel(color: Rgb, adj: &Adjustments) -> Rgb {
    adjust_unclamped(color, adj).to_rgb()
}

/// Adjust every pixel of `raster` in place.
///
/// Pixels are independent at this stage; neutral adjustments leave the
/// buffer untouched.
pub fn adjust_raster(raster: &mut Raster, adj: &Adjustments) {
    if adj.is_neutral() {
        return;
    }
    for pixel in raster.pixels_mut() {
        *pixel = adjust_pixel(*pixel, adj);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adj(exposure: i32, contrast: i32, chrominance: i32) -> Adjustments {
        Adjustments::new(exposure, contrast, chrominance, 0).unwrap()
    }

    #[test]
    fn test_validation_bounds() {
        assert!(Adjustments::new(-10, 10, -10, 10).is_ok());
        assert_eq!(
            Adjustments::new(0, 0, 0, -11),
            Err(Error::InvalidAdjustment {
                name: "dithering",
                value: -11
            })
        );
        assert_eq!(
            Adjustments::new(11, 99, 0, 0),
            Err(Error::InvalidAdjustment {
                name: "exposure",
                value: 11
            })
        );
    }

    #[test]
    fn test_neutral_is_identity() {
        let neutral = Adjustments::default();
        for &c in &[Rgb::BLACK, Rgb::WHITE, Rgb::new(12, 200, 77), Rgb::new(255, 0, 128)] {
            assert_eq!(adjust_pixel(c, &neutral), c);
        }
    }

    #[test]
    fn test_exposure_shift_before_clamp() {
        let out = adjust_unclamped(Rgb::new(128, 128, 128), &adj(10, 0, 0));
        assert_eq!(out, RgbF::splat(178.0));
        assert_eq!(
            adjust_pixel(Rgb::new(240, 240, 240), &adj(10, 0, 0)),
            Rgb::WHITE
        );
        assert_eq!(adjust_pixel(Rgb::new(30, 60, 90), &adj(-10, 0, 0)), Rgb::new(0, 10, 40));
    }

    #[test]
    fn test_contrast_minimum_collapses_to_midpoint() {
        let collapse = adj(7, -10, 4);
        for &c in &[Rgb::BLACK, Rgb::WHITE, Rgb::new(3, 250, 90)] {
            assert_eq!(adjust_unclamped(c, &collapse), RgbF::splat(128.0));
        }
    }

    #[test]
    fn test_contrast_doubles_distance_from_midpoint() {
        let out = adjust_unclamped(Rgb::new(138, 118, 128), &adj(0, 10, 0));
        assert_eq!(out, RgbF::new(148.0, 108.0, 128.0));
    }

    #[test]
    fn test_chrominance_minimum_is_grey() {
        let grey = adj(0, 0, -10);
        for &c in &[Rgb::new(255, 0, 0), Rgb::new(10, 200, 99), Rgb::new(0, 0, 255)] {
            let out = adjust_unclamped(c, &grey);
            assert_eq!(out.r, out.g);
            assert_eq!(out.g, out.b);
            let expected = RgbF::from(c).luma();
            assert!((out.r - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_chrominance_uses_unclamped_luma() {
        // Exposure pushes red past 255; luma is taken from the overflowed
        // value, so the greyed result is brighter than clamping first.
        let out = adjust_unclamped(Rgb::new(250, 0, 0), &adj(10, 0, -10));
        let overflowed_luma = 0.299 * 300.0 + 0.587 * 50.0 + 0.114 * 50.0;
        assert!((out.r - overflowed_luma).abs() < 1e-3);
        let clamped_first_luma = 0.299 * 255.0 + 0.587 * 50.0 + 0.114 * 50.0;
        assert!(out.r > clamped_first_luma);
    }

    #[test]
    fn test_quantize_mode_from_dithering() {
        assert_eq!(Adjustments::default().quantize_mode(), QuantizeMode::Nearest);
        assert_eq!(
            Adjustments::new(0, 0, 0, 10).unwrap().quantize_mode(),
            QuantizeMode::Dither { strength: 1.0 }
        );
        assert_eq!(
            Adjustments::new(0, 0, 0, -3).unwrap().quantize_mode(),
            Adjustments::new(0, 0, 0, 3).unwrap().quantize_mode()
        );
    }

    #[test]
    fn test_adjust_raster_in_place() {
        let mut raster = Raster::filled(3, 2, Rgb::new(100, 100, 100));
        adjust_raster(&mut raster, &adj(2, 0, 0));
        assert!(raster.pixels().iter().all(|&p| p == Rgb::new(110, 110, 110)));
    }
}
