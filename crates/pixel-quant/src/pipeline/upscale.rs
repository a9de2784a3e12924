//! Nearest-neighbour block replication.

use crate::error::Error;
use crate::raster::Raster;

/// Replicate every pixel of `src` into a `factor × factor` block.
///
/// No interpolation takes place: output pixel `(x, y)` equals input pixel
/// `(x / factor, y / factor)`. The alpha plane, if any, is replicated the
/// same way.
///
/// # Errors
///
/// [`Error::InvalidDimensions`] if `factor` is zero.
///
/// # Example
///
/// ```
/// use pixel_quant::{upscale_nearest, Raster, Rgb};
///
/// let src = Raster::new(2, 1, vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let big = upscale_nearest(&src, 3).unwrap();
///
/// assert_eq!((big.width(), big.height()), (6, 3));
/// assert_eq!(big.get(2, 2), Some(Rgb::BLACK));
/// assert_eq!(big.get(3, 0), Some(Rgb::WHITE));
/// ```
pub fn upscale_nearest(src: &Raster, factor: usize) -> Result<Raster, Error> {
    if factor == 0 {
        return Err(Error::InvalidDimensions {
            width: 0,
            height: 0,
        });
    }
    Ok(replicate(src, factor))
}

pub(super) fn replicate(src: &Raster, factor: usize) -> Raster {
    let width = src.width() * factor;
    let height = src.height() * factor;
    let pixels = replicate_plane(src.pixels(), src.width(), factor);
    let alpha = src.alpha().map(|a| replicate_plane(a, src.width(), factor));
    Raster::from_parts_unchecked(width, height, pixels, alpha)
}

fn replicate_plane<T: Copy>(plane: &[T], width: usize, factor: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(plane.len() * factor * factor);
    let mut wide = Vec::with_capacity(width * factor);
    for row in plane.chunks_exact(width.max(1)) {
        wide.clear();
        for &v in row {
            wide.extend(std::iter::repeat(v).take(factor));
        }
        for _ in 0..factor {
            out.extend_from_slice(&wide);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_blocks_are_exact() {
        let src = Raster::new(
            3,
            2,
            vec![
                Rgb::new(1, 0, 0),
                Rgb::new(2, 0, 0),
                Rgb::new(3, 0, 0),
                Rgb::new(4, 0, 0),
                Rgb::new(5, 0, 0),
                Rgb::new(6, 0, 0),
            ],
        )
        .unwrap();
        let big = upscale_nearest(&src, 8).unwrap();
        assert_eq!((big.width(), big.height()), (24, 16));
        for y in 0..16 {
            for x in 0..24 {
                assert_eq!(big.get(x, y), src.get(x / 8, y / 8), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_factor_one_is_identity() {
        let src = Raster::from_rgba8(2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(upscale_nearest(&src, 1).unwrap(), src);
    }

    #[test]
    fn test_alpha_replicated() {
        let src = Raster::from_rgba8(2, 1, &[0, 0, 0, 10, 0, 0, 0, 200]).unwrap();
        let big = upscale_nearest(&src, 2).unwrap();
        assert_eq!(big.alpha(), Some(&[10u8, 10, 200, 200, 10, 10, 200, 200][..]));
    }

    #[test]
    fn test_zero_factor() {
        let src = Raster::filled(1, 1, Rgb::BLACK);
        assert!(matches!(
            upscale_nearest(&src, 0),
            Err(Error::InvalidDimensions { .. })
        ));
    }
}
