//! K-means palette extraction.
//!
//! The source is shrunk to a small working copy, sampled at a fixed stride,
//! and clustered in RGB space. Initial centroids are drawn from the samples
//! by the caller-supplied random source, so results are reproducible only
//! when the caller pins the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::{Rgb, RgbF};
use crate::error::Error;
use crate::palette::Palette;
use crate::raster::Raster;
use crate::resample::{fit_longest_side, resample_area};

/// Centroids closer than this (per channel) to their previous position
/// count as settled.
const CONVERGENCE_THRESHOLD: f32 = 1.0;

/// Palette extraction settings.
///
/// # Example
///
/// ```
/// use pixel_quant::{Quantizer, Raster, Rgb};
///
/// let image = Raster::filled(64, 64, Rgb::new(200, 40, 40));
/// let palette = Quantizer::new().colors(4).extract_seeded(&image, 7).unwrap();
///
/// assert_eq!(palette.len(), 4);
/// assert!(palette.iter().all(|c| c == Rgb::new(200, 40, 40)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantizer {
    k: usize,
    max_iterations: usize,
    max_side: usize,
    sample_stride: usize,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self {
            k: 8,
            max_iterations: 10,
            max_side: 200,
            sample_stride: 4,
        }
    }
}

/// Outcome of one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clusters {
    /// Final centroids, darkest first by unweighted channel mean.
    pub centroids: Vec<RgbF>,
    /// Assignment/update rounds performed.
    pub iterations: usize,
    /// Whether the run stopped because no centroid moved more than 1.0.
    pub converged: bool,
}

impl Clusters {
    /// Round the centroids into a palette, darkest first.
    ///
    /// Rounding can swap two centroids with nearly equal brightness, so the
    /// rounded colors are sorted again. The sort is stable and keys on the
    /// channel sum, which orders exactly like the channel mean.
    pub fn to_palette(&self) -> Result<Palette, Error> {
        let mut colors: Vec<Rgb> = self.centroids.iter().map(|c| c.to_rgb()).collect();
        colors.sort_by_key(|c| c.r as u16 + c.g as u16 + c.b as u16);
        Palette::new(&colors)
    }
}

impl Quantizer {
    /// Defaults: 8 colors, 10 iterations, 200px working size, every 4th pixel.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of palette entries to produce.
    #[inline]
    pub fn colors(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Upper bound on assignment/update rounds.
    #[inline]
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Longest side of the working copy the samples are drawn from.
    #[inline]
    pub fn max_side(mut self, px: usize) -> Self {
        self.max_side = px;
        self
    }

    /// Take every `n`th pixel of the working copy (minimum 1).
    #[inline]
    pub fn sample_stride(mut self, n: usize) -> Self {
        self.sample_stride = n.max(1);
        self
    }

    /// Extract a palette of exactly `k` colors from `source`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if the source or the sample set is empty
    /// - [`Error::InsufficientSamples`] if there are fewer samples than `k`
    /// - [`Error::InvalidPalette`] if `k` is zero
    pub fn extract<R: Rng + ?Sized>(&self, source: &Raster, rng: &mut R) -> Result<Palette, Error> {
        let samples = self.sample(source)?;
        self.cluster(&samples, rng)?.to_palette()
    }

    /// [`extract`](Self::extract) with a seeded [`StdRng`].
    pub fn extract_seeded(&self, source: &Raster, seed: u64) -> Result<Palette, Error> {
        self.extract(source, &mut StdRng::seed_from_u64(seed))
    }

    /// Shrink `source` to the working size and collect every
    /// `sample_stride`th pixel in row-major order.
    pub fn sample(&self, source: &Raster) -> Result<Vec<Rgb>, Error> {
        if source.is_empty() {
            return Err(Error::EmptyInput);
        }
        let (w, h) = fit_longest_side((source.width(), source.height()), self.max_side);
        let working = resample_area(source, w, h)?;

        let samples: Vec<Rgb> = working
            .pixels()
            .iter()
            .step_by(self.sample_stride)
            .copied()
            .collect();
        if samples.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(samples)
    }

    /// Run k-means over `samples`.
    ///
    /// Centroids start at `k` distinct sample positions chosen by `rng`.
    /// Each round assigns every sample to its nearest centroid (first wins on
    /// ties) and moves each centroid to the mean of its members; a centroid
    /// with no members stays where it is.
    pub fn cluster<R: Rng + ?Sized>(&self, samples: &[Rgb], rng: &mut R) -> Result<Clusters, Error> {
        let k = self.k;
        if k == 0 {
            return Err(Error::InvalidPalette);
        }
        if samples.is_empty() {
            return Err(Error::EmptyInput);
        }
        if samples.len() < k {
            return Err(Error::InsufficientSamples {
                samples: samples.len(),
                k,
            });
        }

        let mut centroids: Vec<RgbF> = rand::seq::index::sample(rng, samples.len(), k)
            .iter()
            .map(|i| RgbF::from(samples[i]))
            .collect();

        // Integer sums keep the means exact regardless of sample count.
        let mut sums = vec![[0u64; 3]; k];
        let mut counts = vec![0u64; k];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;
            sums.iter_mut().for_each(|s| *s = [0; 3]);
            counts.iter_mut().for_each(|c| *c = 0);

            for &sample in samples {
                let c = nearest_centroid(RgbF::from(sample), &centroids);
                sums[c][0] += sample.r as u64;
                sums[c][1] += sample.g as u64;
                sums[c][2] += sample.b as u64;
                counts[c] += 1;
            }

            let mut moved = false;
            for (centroid, (sum, &count)) in centroids.iter_mut().zip(sums.iter().zip(&counts)) {
                if count == 0 {
                    continue;
                }
                let n = count as f64;
                let mean = RgbF::new(
                    (sum[0] as f64 / n) as f32,
                    (sum[1] as f64 / n) as f32,
                    (sum[2] as f64 / n) as f32,
                );
                if mean.max_channel_delta(*centroid) > CONVERGENCE_THRESHOLD {
                    moved = true;
                }
                *centroid = mean;
            }

            if !moved {
                converged = true;
                break;
            }
        }

        centroids.sort_by(|a, b| a.mean_luminance().total_cmp(&b.mean_luminance()));

        Ok(Clusters {
            centroids,
            iterations,
            converged,
        })
    }
}

#[inline]
fn nearest_centroid(color: RgbF, centroids: &[RgbF]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, &c) in centroids.iter().enumerate() {
        let d = color.distance_sq(c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}
