//! Owned pixel buffer passed through the pipeline stages.

use crate::color::Rgb;
use crate::error::Error;

/// A `width × height` grid of [`Rgb`] in row-major order, with an optional
/// alpha plane.
///
/// Alpha never takes part in color arithmetic. It is resampled with the same
/// weights as the color channels and replicated on upscale, otherwise carried
/// through untouched.
///
/// A raster is exclusively owned by one pipeline run; stages receive it by
/// value and hand it on, so no two stages can observe it at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    alpha: Option<Vec<u8>>,
}

impl Raster {
    /// Wrap an existing pixel vector.
    ///
    /// # Errors
    ///
    /// [`Error::BufferMismatch`] if `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self, Error> {
        check_len(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
            alpha: None,
        })
    }

    /// A raster with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            alpha: None,
        }
    }

    /// Attach an alpha plane, one byte per pixel.
    ///
    /// # Errors
    ///
    /// [`Error::BufferMismatch`] if the plane length differs from the pixel count.
    pub fn with_alpha(mut self, alpha: Vec<u8>) -> Result<Self, Error> {
        check_len(self.width, self.height, alpha.len())?;
        self.alpha = Some(alpha);
        Ok(self)
    }

    /// Build from packed `[R, G, B, R, G, B, ...]` bytes.
    pub fn from_rgb8(width: usize, height: usize, data: &[u8]) -> Result<Self, Error> {
        check_len(width, height * 3, data.len())?;
        let pixels = data
            .chunks_exact(3)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Build from packed `[R, G, B, A, ...]` bytes, keeping alpha aside.
    pub fn from_rgba8(width: usize, height: usize, data: &[u8]) -> Result<Self, Error> {
        check_len(width, height * 4, data.len())?;
        let (pixels, alpha): (Vec<Rgb>, Vec<u8>) = data
            .chunks_exact(4)
            .map(|p| (Rgb::new(p[0], p[1], p[2]), p[3]))
            .unzip();
        Self::new(width, height, pixels)?.with_alpha(alpha)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    #[inline]
    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    /// Pixel at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Iterate over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> + '_ {
        // chunks_exact(0) panics; an empty raster has no rows either way
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// Packed RGB bytes (alpha dropped).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_bytes()).collect()
    }

    /// Packed RGBA bytes; fully opaque when there is no alpha plane.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for (i, c) in self.pixels.iter().enumerate() {
            let a = self.alpha.as_ref().map_or(255, |alpha| alpha[i]);
            out.extend_from_slice(&[c.r, c.g, c.b, a]);
        }
        out
    }

    pub(crate) fn from_parts_unchecked(
        width: usize,
        height: usize,
        pixels: Vec<Rgb>,
        alpha: Option<Vec<u8>>,
    ) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        debug_assert!(alpha.as_ref().map_or(true, |a| a.len() == width * height));
        Self {
            width,
            height,
            pixels,
            alpha,
        }
    }
}

fn check_len(width: usize, height: usize, actual: usize) -> Result<(), Error> {
    let expected = width * height;
    if expected != actual {
        return Err(Error::BufferMismatch { expected, actual });
    }
    Ok(())
}
