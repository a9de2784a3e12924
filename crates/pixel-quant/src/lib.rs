#![allow(clippy::module_inception, clippy::needless_range_loop)]

//! pixel-quant: fixed-palette quantization for low-resolution pixel art
//!
//! The crate turns a full-color raster into a small image restricted to a
//! handful of colors, then blows it back up with hard-edged blocks. It does
//! no I/O; callers hand in decoded pixels and take rasters back out.
//!
//! # Quick Start
//!
//! ```
//! use pixel_quant::{Adjustments, Palette, Pipeline, Raster, Rgb};
//!
//! let palette = Palette::from_hex(&["#000000", "#555555", "#AAAAAA", "#FFFFFF"]).unwrap();
//! let source = Raster::filled(640, 480, Rgb::new(120, 130, 140));
//!
//! let result = Pipeline::new(palette)
//!     .adjustments(Adjustments::new(1, 0, 0, 6).unwrap())
//!     .run(&source)
//!     .unwrap();
//!
//! assert_eq!(result.low_res().width(), 171);
//! assert_eq!(result.high_res().width(), 171 * 8);
//! ```
//!
//! # Stages
//!
//! A run is strictly sequential:
//!
//! 1. **Resample** the source into the target box (default 256×128) with an
//!    area-averaging filter ([`resample`]).
//! 2. **Adjust** exposure, contrast and chrominance per pixel ([`adjust`]).
//! 3. **Quantize** to the palette, either by nearest color or by
//!    Floyd-Steinberg error diffusion ([`dither`]). The choice is a
//!    [`QuantizeMode`] derived from the dithering amount.
//! 4. **Upscale** by nearest-neighbour block replication (default 8×).
//!
//! # Palettes
//!
//! A [`Palette`] is an ordered list; nearest-color ties go to the earlier
//! entry. Palettes come from the caller or from the image itself via the
//! k-means [`Quantizer`], which takes an injectable random source:
//!
//! ```
//! use pixel_quant::{Quantizer, Raster, Rgb};
//!
//! let image = Raster::filled(32, 32, Rgb::new(10, 120, 200));
//! let palette = Quantizer::new().extract_seeded(&image, 1).unwrap();
//! assert_eq!(palette.len(), 8);
//! ```

pub mod adjust;
pub mod color;
pub mod dither;
pub mod error;
pub mod palette;
pub mod pipeline;
pub mod quantize;
pub mod raster;
pub mod resample;

#[cfg(test)]
mod domain_tests;

pub use adjust::{adjust_pixel, Adjustments, QuantizeMode};
pub use color::{Rgb, RgbF};
pub use dither::{map_nearest, FloydSteinberg};
pub use error::{Error, ParseColorError};
pub use palette::Palette;
pub use pipeline::{upscale_nearest, Conversion, Pipeline, Stage};
pub use quantize::Quantizer;
pub use raster::Raster;
