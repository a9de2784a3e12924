//! Fixed, ordered color palettes and nearest-color matching.

mod palette;

pub use palette::Palette;
