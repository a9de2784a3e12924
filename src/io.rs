//! Image decoding and PNG encoding
//!
//! Decoding goes through the `image` crate so any format it understands can
//! be converted. Encoding writes PNG directly with the `png` crate so the
//! output format can follow the content:
//!
//! - Opaque raster, every color in the run's palette → indexed (color type 3)
//!   with a deduplicated PLTE, packed at 1, 2, 4 or 8 bits
//! - Opaque raster otherwise → RGB8
//! - Any transparency → RGBA8
//!
//! The encoded stream is then re-compressed with oxipng.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use pixel_quant::{Palette, Raster, Rgb};

use crate::error::AppError;

/// Decode an image file into a raster.
///
/// The alpha plane is kept only when the source format carries one.
pub fn decode_file(path: &Path) -> Result<Raster, AppError> {
    let img = image::open(path).map_err(|source| AppError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    from_dynamic(img)
}

/// Decode an in-memory image.
pub fn decode_bytes(data: &[u8]) -> Result<Raster, AppError> {
    let img = image::load_from_memory(data).map_err(|source| AppError::Decode {
        path: "<memory>".into(),
        source,
    })?;
    from_dynamic(img)
}

fn from_dynamic(img: image::DynamicImage) -> Result<Raster, AppError> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let raster = if img.color().has_alpha() {
        Raster::from_rgba8(width, height, img.to_rgba8().as_raw())?
    } else {
        Raster::from_rgb8(width, height, img.to_rgb8().as_raw())?
    };
    tracing::debug!(width, height, alpha = raster.alpha().is_some(), "Decoded image");
    Ok(raster)
}

/// Encode `raster` as an optimized PNG.
pub fn encode_png(raster: &Raster, palette: Option<&Palette>) -> Result<Vec<u8>, AppError> {
    let png_bytes = encode_png_raw(raster, palette)?;

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

/// Encode `raster` as PNG without re-compression.
///
/// See the module docs for how the color type is chosen.
pub fn encode_png_raw(raster: &Raster, palette: Option<&Palette>) -> Result<Vec<u8>, AppError> {
    let (width, height) = png_dimensions(raster)?;

    let opaque = raster.alpha().map_or(true, |a| a.iter().all(|&v| v == 255));
    if !opaque {
        return encode(
            width,
            height,
            png::ColorType::Rgba,
            png::BitDepth::Eight,
            None,
            &raster.to_rgba8(),
        );
    }

    if let Some(indexed) = palette.and_then(|p| index_pixels(raster, p)) {
        let (depth, bits) = match indexed.plte.len() {
            0..=2 => (png::BitDepth::One, 1),
            3..=4 => (png::BitDepth::Two, 2),
            5..=16 => (png::BitDepth::Four, 4),
            _ => (png::BitDepth::Eight, 8),
        };
        let plte: Vec<u8> = indexed.plte.iter().flat_map(|c| c.to_bytes()).collect();
        let packed = if bits == 8 {
            indexed.indices
        } else {
            pack_nbits(&indexed.indices, raster.width(), bits)
        };
        return encode(width, height, png::ColorType::Indexed, depth, Some(&plte), &packed);
    }

    encode(
        width,
        height,
        png::ColorType::Rgb,
        png::BitDepth::Eight,
        None,
        &raster.to_rgb8(),
    )
}

fn png_dimensions(raster: &Raster) -> Result<(u32, u32), AppError> {
    let invalid = || {
        AppError::Pipeline(pixel_quant::Error::InvalidDimensions {
            width: raster.width(),
            height: raster.height(),
        })
    };
    if raster.is_empty() {
        return Err(invalid());
    }
    let width = u32::try_from(raster.width()).map_err(|_| invalid())?;
    let height = u32::try_from(raster.height()).map_err(|_| invalid())?;
    Ok((width, height))
}

struct Indexed {
    plte: Vec<Rgb>,
    indices: Vec<u8>,
}

/// Map every pixel to an index into the deduplicated palette, or `None` if
/// some pixel is not a palette color.
fn index_pixels(raster: &Raster, palette: &Palette) -> Option<Indexed> {
    let mut plte: Vec<Rgb> = Vec::new();
    let mut lookup: HashMap<Rgb, u8> = HashMap::new();
    for color in palette.iter() {
        if lookup.contains_key(&color) {
            continue;
        }
        let idx = u8::try_from(plte.len()).ok()?;
        lookup.insert(color, idx);
        plte.push(color);
    }

    let indices = raster
        .pixels()
        .iter()
        .map(|p| lookup.get(p).copied())
        .collect::<Option<Vec<u8>>>()?;
    Some(Indexed { plte, indices })
}

fn encode(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, AppError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(data)
            .map_err(|e| AppError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack palette indices into N-bit PNG row data (1, 2, or 4 bits per pixel).
///
/// Each row starts on a byte boundary.
fn pack_nbits(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let height = indices.len() / width;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
