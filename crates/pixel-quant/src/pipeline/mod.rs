//! Pipeline builder and the strictly sequential stage run.
//!
//! [`Pipeline`] holds the configuration of one conversion. Running it walks
//! `Idle → Resampled → Adjusted → Quantized → Upscaled → Done`; each stage
//! is a distinct type that consumes its predecessor, so stages cannot be
//! skipped, reordered or repeated, and the working raster always has exactly
//! one owner.

mod stages;
mod upscale;

pub use stages::{Adjusted, Conversion, Quantized, Resampled};
pub use upscale::upscale_nearest;

use crate::adjust::{Adjustments, QuantizeMode};
use crate::error::Error;
use crate::palette::Palette;
use crate::raster::Raster;
use crate::resample::{fit_within, resample_area, DEFAULT_TARGET};

use stages::RunConfig;

/// Default nearest-neighbour upscale factor for the output image.
pub const DEFAULT_UPSCALE: usize = 8;

/// Position of a run in the stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Idle,
    Resampled,
    Adjusted,
    Quantized,
    Upscaled,
    Done,
}

/// Configuration for converting one source raster.
///
/// Construction requires a [`Palette`]; everything else has a default
/// (256×128 target box, neutral adjustments, 8× upscale). The builder is
/// reusable: [`run`](Self::run) and [`start`](Self::start) take `&self` and
/// every run gets its own working buffers.
///
/// # Example
///
/// ```
/// use pixel_quant::{Adjustments, Palette, Pipeline, Raster, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let source = Raster::filled(512, 512, Rgb::new(230, 230, 230));
///
/// let result = Pipeline::new(palette)
///     .target(64, 32)
///     .adjustments(Adjustments::new(0, 2, 0, 0).unwrap())
///     .upscale(4)
///     .run(&source)
///     .unwrap();
///
/// assert_eq!((result.low_res().width(), result.low_res().height()), (32, 32));
/// assert_eq!((result.high_res().width(), result.high_res().height()), (128, 128));
/// assert!(result.low_res().pixels().iter().all(|&p| p == Rgb::WHITE));
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    palette: Palette,
    adjustments: Adjustments,
    target: (usize, usize),
    upscale: usize,
}

impl Pipeline {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            adjustments: Adjustments::default(),
            target: DEFAULT_TARGET,
            upscale: DEFAULT_UPSCALE,
        }
    }

    /// Bounding box the low-resolution raster is fitted into.
    #[inline]
    pub fn target(mut self, width: usize, height: usize) -> Self {
        self.target = (width, height);
        self
    }

    #[inline]
    pub fn adjustments(mut self, adjustments: Adjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    /// Block size each low-resolution pixel is replicated into.
    #[inline]
    pub fn upscale(mut self, factor: usize) -> Self {
        self.upscale = factor;
        self
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn target_box(&self) -> (usize, usize) {
        self.target
    }

    #[inline]
    pub fn upscale_factor(&self) -> usize {
        self.upscale
    }

    #[inline]
    pub fn quantize_mode(&self) -> QuantizeMode {
        self.adjustments.quantize_mode()
    }

    /// A pipeline that has not started is idle.
    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::Idle
    }

    /// Validate the configuration and resample `source` into a fresh working
    /// raster.
    ///
    /// All configuration errors surface here, before any pixel work.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for a zero target side or upscale factor
    /// - [`Error::EmptyInput`] if `source` has no pixels
    pub fn start(&self, source: &Raster) -> Result<Resampled, Error> {
        if self.upscale == 0 {
            return Err(Error::InvalidDimensions {
                width: 0,
                height: 0,
            });
        }
        let (width, height) = fit_within((source.width(), source.height()), self.target)?;
        let working = resample_area(source, width, height)?;

        Ok(Resampled::new(
            working,
            RunConfig {
                palette: self.palette.clone(),
                adjustments: self.adjustments,
                upscale: self.upscale,
            },
        ))
    }

    /// Run every stage and return both rasters.
    pub fn run(&self, source: &Raster) -> Result<Conversion, Error> {
        Ok(self.start(source)?.adjust().quantize().upscale())
    }
}
