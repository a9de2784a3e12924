//! Area-averaging resampler and output-size fitting.
//!
//! Resampling is separable: a horizontal pass into an `f32` buffer, then a
//! vertical pass. Each destination pixel averages the source pixels its
//! footprint covers, weighted by the covered length, so downscaling is a true
//! box average and upscaling blends at most two neighbours per axis. The
//! result is a mix of source colors only; no palette is involved.

use crate::color::{Rgb, RgbF};
use crate::error::Error;
use crate::raster::Raster;

/// Default bounding box for the low-resolution working raster.
pub const DEFAULT_TARGET: (usize, usize) = (256, 128);

/// Fit `source` inside `bounds`, preserving aspect ratio.
///
/// Wider-than-box sources take the full box width; everything else takes the
/// full box height. The other side is rounded and never drops below 1.
///
/// # Errors
///
/// - [`Error::InvalidDimensions`] if either bound is zero
/// - [`Error::EmptyInput`] if the source has no pixels
///
/// # Example
///
/// ```
/// use pixel_quant::resample::fit_within;
///
/// assert_eq!(fit_within((1600, 1200), (256, 128)).unwrap(), (171, 128));
/// assert_eq!(fit_within((1920, 480), (256, 128)).unwrap(), (256, 64));
/// ```
pub fn fit_within(source: (usize, usize), bounds: (usize, usize)) -> Result<(usize, usize), Error> {
    let (src_w, src_h) = source;
    let (box_w, box_h) = bounds;
    if box_w == 0 || box_h == 0 {
        return Err(Error::InvalidDimensions {
            width: box_w,
            height: box_h,
        });
    }
    if src_w == 0 || src_h == 0 {
        return Err(Error::EmptyInput);
    }

    let source_aspect = src_w as f64 / src_h as f64;
    let target_aspect = box_w as f64 / box_h as f64;

    let fitted = if source_aspect > target_aspect {
        (box_w, (box_w as f64 / source_aspect).round() as usize)
    } else {
        ((box_h as f64 * source_aspect).round() as usize, box_h)
    };
    Ok((fitted.0.max(1), fitted.1.max(1)))
}

/// Shrink `source` so its longer side is at most `max_side`.
///
/// Sources already within the limit keep their size. The shorter side is
/// truncated, as a canvas does with fractional sizes, but never below 1.
pub fn fit_longest_side(source: (usize, usize), max_side: usize) -> (usize, usize) {
    let (w, h) = source;
    let max_side = max_side.max(1);
    if w > h {
        if w > max_side {
            return (max_side, (h * max_side / w).max(1));
        }
    } else if h > max_side {
        return ((w * max_side / h).max(1), max_side);
    }
    (w, h)
}

/// Precomputed contributions for one destination index.
#[derive(Debug)]
struct AreaWeights {
    start: usize,
    weights: Vec<f32>,
}

fn area_weights(src_len: usize, dst_len: usize) -> Vec<AreaWeights> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|i| {
            let lo = i as f64 * scale;
            let hi = ((i + 1) as f64 * scale).min(src_len as f64);
            let start = (lo.floor() as usize).min(src_len - 1);
            let end = (hi.ceil() as usize).clamp(start + 1, src_len);

            let mut weights: Vec<f32> = (start..end)
                .map(|s| {
                    let covered = hi.min((s + 1) as f64) - lo.max(s as f64);
                    covered.max(0.0) as f32
                })
                .collect();

            let sum: f32 = weights.iter().sum();
            if sum > 0.0 {
                weights.iter_mut().for_each(|w| *w /= sum);
            } else {
                weights.iter_mut().for_each(|w| *w = 0.0);
                weights[0] = 1.0;
            }

            AreaWeights { start, weights }
        })
        .collect()
}

/// Resample `src` to exactly `width × height` by area averaging.
///
/// The alpha plane, if any, is resampled with the same weights.
///
/// # Errors
///
/// - [`Error::InvalidDimensions`] if `width` or `height` is zero
/// - [`Error::EmptyInput`] if `src` has no pixels
pub fn resample_area(src: &Raster, width: usize, height: usize) -> Result<Raster, Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    if src.is_empty() {
        return Err(Error::EmptyInput);
    }
    if src.width() == width && src.height() == height {
        return Ok(src.clone());
    }

    let (src_w, src_h) = (src.width(), src.height());
    let x_weights = area_weights(src_w, width);
    let y_weights = area_weights(src_h, height);
    let alpha = src.alpha();

    // Horizontal pass: src_h rows of `width` samples.
    let mut horizontal = vec![(RgbF::default(), 0.0f32); width * src_h];
    for (y, row) in src.rows().enumerate() {
        let alpha_row = alpha.map(|a| &a[y * src_w..(y + 1) * src_w]);
        for (x, kw) in x_weights.iter().enumerate() {
            let mut color = RgbF::default();
            let mut a = 0.0f32;
            for (i, &w) in kw.weights.iter().enumerate() {
                color += RgbF::from(row[kw.start + i]) * w;
                if let Some(alpha_row) = alpha_row {
                    a += alpha_row[kw.start + i] as f32 * w;
                }
            }
            horizontal[y * width + x] = (color, a);
        }
    }

    // Vertical pass.
    let mut pixels = Vec::with_capacity(width * height);
    let mut out_alpha = alpha.map(|_| Vec::with_capacity(width * height));
    for kw in &y_weights {
        for x in 0..width {
            let mut color = RgbF::default();
            let mut a = 0.0f32;
            for (i, &w) in kw.weights.iter().enumerate() {
                let (c, ca) = horizontal[(kw.start + i) * width + x];
                color += c * w;
                a += ca * w;
            }
            pixels.push(color.to_rgb());
            if let Some(out_alpha) = out_alpha.as_mut() {
                out_alpha.push(a.round().clamp(0.0, 255.0) as u8);
            }
        }
    }

    Ok(Raster::from_parts_unchecked(width, height, pixels, out_alpha))
}
