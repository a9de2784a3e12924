//! Error types for the pixel-quant pipeline.
//!
//! Every stage reports failures through the single [`Error`] enum so callers
//! can propagate with `?` and match on the kind. Numeric edge cases inside a
//! stage (channel overflow, contrast collapse) are clamped behaviour, never
//! errors.

use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 digits after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,

    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0:?}")]
    InvalidHex(char),
}

/// Unified error type for all pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Zero-pixel source raster, or nothing left to sample for clustering.
    #[error("input contains no pixels")]
    EmptyInput,

    /// Fewer candidate samples than requested clusters.
    #[error("cannot extract {k} colors from {samples} samples")]
    InsufficientSamples { samples: usize, k: usize },

    /// Palette with no entries supplied to the mapper or ditherer.
    #[error("palette cannot be empty")]
    InvalidPalette,

    /// Adjustment parameter outside [-10, 10].
    #[error("{name} must be within -10..=10, got {value}")]
    InvalidAdjustment { name: &'static str, value: i32 },

    /// Zero width or height requested.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Pixel buffer length does not match the stated dimensions.
    #[error("buffer length mismatch: expected {expected}, got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::EmptyInput.to_string(), "input contains no pixels");
        assert_eq!(
            Error::InsufficientSamples { samples: 3, k: 8 }.to_string(),
            "cannot extract 8 colors from 3 samples"
        );
        assert_eq!(
            Error::InvalidAdjustment {
                name: "contrast",
                value: 11
            }
            .to_string(),
            "contrast must be within -10..=10, got 11"
        );
        assert_eq!(
            Error::InvalidDimensions {
                width: 0,
                height: 128
            }
            .to_string(),
            "invalid dimensions: 0x128"
        );
    }

    #[test]
    fn test_parse_color_error_converts() {
        let err: Error = ParseColorError::InvalidLength.into();
        assert!(matches!(err, Error::ParseColor(ParseColorError::InvalidLength)));
    }
}
