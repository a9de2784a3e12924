//! Assertion helpers for tests.

use std::path::Path;

use pixel_quant::{Palette, Raster};
use pretty_assertions::assert_eq;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Assert the file exists, is a PNG, and return its decoded raster.
pub fn assert_png(path: &Path) -> Raster {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected PNG at {}: {e}", path.display()));
    assert!(
        bytes.starts_with(&PNG_SIGNATURE),
        "Expected PNG signature, got {:?}",
        &bytes[..8.min(bytes.len())]
    );
    lowreslove::io::decode_bytes(&bytes).expect("PNG should decode")
}

/// Assert the raster has the given size.
pub fn assert_size(raster: &Raster, width: usize, height: usize) {
    assert_eq!((raster.width(), raster.height()), (width, height));
}

/// Assert every pixel is one of the palette's colors.
pub fn assert_only_palette_colors(raster: &Raster, palette: &Palette) {
    for (i, &p) in raster.pixels().iter().enumerate() {
        assert!(
            palette.contains(p),
            "Pixel {i} ({p:?}) is not in palette {:?}",
            palette.to_hex_strings()
        );
    }
}
