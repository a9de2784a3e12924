use std::path::PathBuf;

use thiserror::Error;

/// Failures outside the pixel pipeline itself: reading and writing files,
/// decoding and encoding images, loading palettes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Palette catalog error: {0}")]
    Catalog(String),

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    #[error("Conversion error: {0}")]
    Pipeline(#[from] pixel_quant::Error),

    #[error("Task failed: {0}")]
    Task(String),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}
