//! Per-run conversion settings gathered from the command line.

use std::path::{Path, PathBuf};

use pixel_quant::{Adjustments, Palette, Pipeline, Quantizer};

use crate::catalog::AUTO_PALETTE;

/// Output file name for a single conversion without `-o`.
pub const DEFAULT_OUTPUT: &str = "lowreslove-image.png";

/// Settings shared by every image of one invocation.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Catalog name, or `auto` to extract a palette per image
    pub palette: String,
    pub adjustments: Adjustments,
    /// Bounding box for the low-resolution image
    pub target: (usize, usize),
    /// Block size of the upscaled output
    pub scale: usize,
    /// Pins k-means initialization for `auto`
    pub seed: Option<u64>,
    /// Palette size for `auto`
    pub colors: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            palette: AUTO_PALETTE.to_string(),
            adjustments: Adjustments::default(),
            target: pixel_quant::resample::DEFAULT_TARGET,
            scale: pixel_quant::pipeline::DEFAULT_UPSCALE,
            seed: None,
            colors: 8,
        }
    }
}

impl ConvertOptions {
    /// Pipeline configured with these settings and `palette`.
    pub fn pipeline(&self, palette: Palette) -> Pipeline {
        Pipeline::new(palette)
            .target(self.target.0, self.target.1)
            .adjustments(self.adjustments)
            .upscale(self.scale)
    }

    /// Quantizer for image-derived palettes.
    pub fn quantizer(&self) -> Quantizer {
        Quantizer::new().colors(self.colors)
    }
}

/// Where the upscaled image of `input` goes when writing into `out_dir`.
///
/// `photos/cat.jpg` becomes `<out_dir>/cat-lowres.png`.
pub fn output_path_in(out_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    out_dir.join(format!("{stem}-lowres.png"))
}
