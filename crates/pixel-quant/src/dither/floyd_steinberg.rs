//! Floyd-Steinberg error diffusion with adjustable strength.

use crate::color::RgbF;
use crate::palette::Palette;
use crate::raster::Raster;

use super::{Kernel, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion.
///
/// The raster is scanned once, top to bottom and left to right. Each pixel is
/// snapped to its nearest palette entry and becomes final; the difference,
/// scaled by `strength`, is pushed to the unvisited neighbours of the
/// [`FLOYD_STEINBERG`] kernel. Neighbours outside the raster are skipped and
/// their share is lost.
///
/// The working buffer keeps 8-bit channels, so every push is rounded and
/// clamped to 0..=255 as it lands. A pixel that already equals a palette
/// entry produces zero error and leaves its neighbours untouched.
///
/// The scan has a read-after-write dependency on every neighbour and cannot
/// be split across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloydSteinberg {
    strength: f32,
}

impl FloydSteinberg {
    /// Diffuse `strength` (clamped to `0.0..=1.0`) of each pixel's error.
    pub fn new(strength: f32) -> Self {
        Self {
            strength: strength.clamp(0.0, 1.0),
        }
    }

    /// Strength from a signed `-10..=10` dithering amount; `None` for zero.
    pub fn from_amount(amount: i8) -> Option<Self> {
        match amount {
            0 => None,
            a => Some(Self::new(a.unsigned_abs() as f32 / 10.0)),
        }
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Quantize `raster` in place so every pixel holds a palette color.
    pub fn dither(&self, raster: &mut Raster, palette: &Palette) {
        diffuse(raster, palette, &FLOYD_STEINBERG, self.strength);
    }
}

fn diffuse(raster: &mut Raster, palette: &Palette, kernel: &Kernel, strength: f32) {
    let width = raster.width();
    let height = raster.height();
    let pixels = raster.pixels_mut();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let current = pixels[idx];
            let (_, chosen) = palette.find_nearest(current);
            pixels[idx] = chosen;

            if current == chosen {
                continue;
            }
            let error = (RgbF::from(current) - RgbF::from(chosen)) * strength;

            for &(dx, dy, weight) in kernel.entries {
                let Some(nx) = x.checked_add_signed(dx as isize) else {
                    continue;
                };
                let ny = y + dy as usize;
                if nx >= width || ny >= height {
                    continue;
                }
                let n = ny * width + nx;
                pixels[n] = (RgbF::from(pixels[n]) + error * kernel.share(weight)).to_rgb();
            }
        }
    }
}
