//! Color value types.
//!
//! - [`Rgb`]: 8-bit channels, the only representation stored in a raster or
//!   palette. Every conversion into it clamps to 0..=255.
//! - [`RgbF`]: continuous channels for intermediate arithmetic (adjustment
//!   overflow, k-means centroids, diffusion error). Never stored.
//!
//! ```
//! use pixel_quant::{Rgb, RgbF};
//!
//! let teal: Rgb = "#00AAAA".parse().unwrap();
//! let brighter = RgbF::from(teal) + RgbF::splat(300.0);
//! assert_eq!(brighter.to_rgb(), Rgb::new(255, 255, 255));
//! ```

mod rgb;
mod rgbf;

pub use rgb::Rgb;
pub use rgbf::RgbF;

/// Rec. 601 luma weights used by the chrominance adjustment.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
