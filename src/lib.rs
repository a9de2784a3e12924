//! Lowreslove - low-resolution, fixed-palette pixel art from photos
//!
//! Front end around the `pixel-quant` pipeline: image decoding, PNG
//! encoding, the named palette catalog and batch scheduling.
//! This library exposes modules for integration testing.

pub mod catalog;
pub mod config;
pub mod convert;
pub mod error;
pub mod io;
