//! Typestate wrappers for each step of a run.

use crate::adjust::{adjust_raster, Adjustments, QuantizeMode};
use crate::dither::quantize;
use crate::palette::Palette;
use crate::raster::Raster;

use super::upscale::replicate;
use super::Stage;

/// Settings a run carries from stage to stage.
#[derive(Debug, Clone)]
pub(super) struct RunConfig {
    pub(super) palette: Palette,
    pub(super) adjustments: Adjustments,
    pub(super) upscale: usize,
}

/// Working raster fitted into the target box; no palette color yet.
#[derive(Debug)]
pub struct Resampled {
    raster: Raster,
    config: RunConfig,
}

impl Resampled {
    pub(super) fn new(raster: Raster, config: RunConfig) -> Self {
        Self { raster, config }
    }

    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::Resampled
    }

    /// Apply exposure, contrast and chrominance to every pixel.
    pub fn adjust(self) -> Adjusted {
        let Self { mut raster, config } = self;
        adjust_raster(&mut raster, &config.adjustments);
        Adjusted { raster, config }
    }
}

/// Adjusted working raster, ready for quantization.
#[derive(Debug)]
pub struct Adjusted {
    raster: Raster,
    config: RunConfig,
}

impl Adjusted {
    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::Adjusted
    }

    /// Snap every pixel to the palette, dithering when the run asks for it.
    pub fn quantize(self) -> Quantized {
        let Self { mut raster, config } = self;
        let mode = config.adjustments.quantize_mode();
        quantize(&mut raster, &config.palette, mode);
        Quantized {
            raster,
            config,
            mode,
        }
    }
}

/// Low-resolution raster holding palette colors only.
#[derive(Debug)]
pub struct Quantized {
    raster: Raster,
    config: RunConfig,
    mode: QuantizeMode,
}

impl Quantized {
    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::Quantized
    }

    /// Replicate each pixel into a square block and finish the run.
    pub fn upscale(self) -> Conversion {
        let high_res = replicate(&self.raster, self.config.upscale);
        Conversion {
            low_res: self.raster,
            high_res,
            palette: self.config.palette,
            mode: self.mode,
        }
    }
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct Conversion {
    low_res: Raster,
    high_res: Raster,
    palette: Palette,
    mode: QuantizeMode,
}

impl Conversion {
    /// Quantized raster at working resolution.
    #[inline]
    pub fn low_res(&self) -> &Raster {
        &self.low_res
    }

    /// Quantized raster after block replication.
    #[inline]
    pub fn high_res(&self) -> &Raster {
        &self.high_res
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Strategy used by the quantize stage.
    #[inline]
    pub fn mode(&self) -> QuantizeMode {
        self.mode
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::Done
    }

    /// `(low_res, high_res)`.
    pub fn into_parts(self) -> (Raster, Raster) {
        (self.low_res, self.high_res)
    }
}
