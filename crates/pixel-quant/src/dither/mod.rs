//! Palette quantization: direct nearest-color mapping and error diffusion.
//!
//! A pipeline run uses exactly one of the two, chosen by [`QuantizeMode`].

mod floyd_steinberg;
mod kernel;

pub use floyd_steinberg::FloydSteinberg;
pub use kernel::*;

use crate::adjust::QuantizeMode;
use crate::palette::Palette;
use crate::raster::Raster;

/// Replace every pixel with its nearest palette entry.
///
/// Pixels are independent; ties resolve to the earlier palette entry.
pub fn map_nearest(raster: &mut Raster, palette: &Palette) {
    for pixel in raster.pixels_mut() {
        *pixel = palette.find_nearest(*pixel).1;
    }
}

/// Quantize `raster` in place with the strategy `mode` selects.
pub fn quantize(raster: &mut Raster, palette: &Palette, mode: QuantizeMode) {
    match mode {
        QuantizeMode::Nearest => map_nearest(raster, palette),
        QuantizeMode::Dither { strength } => FloydSteinberg::new(strength).dither(raster, palette),
    }
}
