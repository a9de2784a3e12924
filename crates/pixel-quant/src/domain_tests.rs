//! Regression tests for the observable contract of a full run.
//!
//! Each test names the property it pins down; a failure means a stage
//! changed behaviour that callers can see in the output image.

#[cfg(test)]
mod domain_tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::adjust::{adjust_pixel, Adjustments, QuantizeMode};
    use crate::color::Rgb;
    use crate::dither::map_nearest;
    use crate::palette::Palette;
    use crate::pipeline::{Pipeline, Stage};
    use crate::quantize::Quantizer;
    use crate::raster::Raster;

    fn noise(width: usize, height: usize, seed: u64) -> Raster {
        let mut rng = StdRng::seed_from_u64(seed);
        let pixels = (0..width * height)
            .map(|_| Rgb::new(rng.gen(), rng.gen(), rng.gen()))
            .collect();
        Raster::new(width, height, pixels).unwrap()
    }

    fn cga() -> Palette {
        Palette::from_hex(&[
            "#000000", "#0000AA", "#00AA00", "#00AAAA", "#AA0000", "#AA00AA", "#AA5500", "#AAAAAA",
        ])
        .unwrap()
    }

    fn adj(exposure: i32, contrast: i32, chrominance: i32, dithering: i32) -> Adjustments {
        Adjustments::new(exposure, contrast, chrominance, dithering).unwrap()
    }

    // ========================================================================
    // Neutral settings: output is exactly nearest-color of the resample
    // ========================================================================

    /// If this breaks, the adjustment stage drifts pixels even with all
    /// parameters at zero, or the mapper is not the plain nearest search.
    #[test]
    fn test_neutral_run_is_nearest_of_resampled() {
        let source = noise(300, 200, 1);
        let pipeline = Pipeline::new(cga()).target(60, 40);

        let mut expected = pipeline.start(&source).unwrap().raster().clone();
        map_nearest(&mut expected, pipeline.palette());

        let result = pipeline.run(&source).unwrap();
        assert_eq!(result.low_res(), &expected);
        assert_eq!(result.mode(), QuantizeMode::Nearest);
    }

    // ========================================================================
    // Adjustment degenerate cases, observed at the stage boundary
    // ========================================================================

    /// Contrast at its minimum multiplies by zero, so every channel lands on
    /// the midpoint no matter what exposure or chrominance did.
    #[test]
    fn test_min_contrast_collapses_to_128() {
        let source = noise(40, 20, 2);
        let adjusted = Pipeline::new(cga())
            .target(40, 20)
            .adjustments(adj(6, -10, 9, 0))
            .start(&source)
            .unwrap()
            .adjust();
        assert!(adjusted
            .raster()
            .pixels()
            .iter()
            .all(|&p| p == Rgb::new(128, 128, 128)));
    }

    /// Chrominance at its minimum must leave only grey pixels.
    #[test]
    fn test_min_chrominance_is_grey() {
        let source = noise(40, 20, 3);
        let adjusted = Pipeline::new(cga())
            .target(40, 20)
            .adjustments(adj(-3, 4, -10, 0))
            .start(&source)
            .unwrap()
            .adjust();
        for p in adjusted.raster().pixels() {
            assert!(p.r == p.g && p.g == p.b, "{p:?} is not grey");
        }
    }

    /// Exposure is additive before clamping.
    #[test]
    fn test_exposure_reference_values() {
        let bright = adj(10, 0, 0, 0);
        assert_eq!(adjust_pixel(Rgb::new(128, 128, 128), &bright), Rgb::new(178, 178, 178));
        assert_eq!(adjust_pixel(Rgb::new(240, 240, 240), &bright), Rgb::WHITE);
    }

    // ========================================================================
    // Palette extraction
    // ========================================================================

    /// A flat image has one color to offer; all k centroids collapse onto it
    /// and none is invented.
    #[test]
    fn test_single_color_extraction_collapses() {
        let color = Rgb::new(33, 144, 201);
        let source = Raster::filled(120, 90, color);
        for seed in 0..5 {
            let palette = Quantizer::new().extract_seeded(&source, seed).unwrap();
            assert_eq!(palette.len(), 8);
            assert!(palette.iter().all(|c| c == color), "seed {seed}: {palette:?}");
        }
    }

    /// Extracted palettes run darkest to brightest.
    #[test]
    fn test_extracted_palette_sorted() {
        let source = noise(256, 256, 4);
        let palette = Quantizer::new().extract_seeded(&source, 11).unwrap();
        let means: Vec<f32> = palette.iter().map(Rgb::mean_luminance).collect();
        for pair in means.windows(2) {
            assert!(pair[0] <= pair[1], "{means:?}");
        }
    }

    /// Pinning the seed pins the palette, and with it the whole run.
    #[test]
    fn test_seeded_auto_palette_run_is_reproducible() {
        let source = noise(200, 150, 5);
        let run = |seed| {
            let palette = Quantizer::new().extract_seeded(&source, seed).unwrap();
            Pipeline::new(palette)
                .adjustments(adj(0, 0, 0, 7))
                .run(&source)
                .unwrap()
                .into_parts()
        };
        assert_eq!(run(99), run(99));
    }

    // ========================================================================
    // Upscale
    // ========================================================================

    /// Each low-res pixel becomes an exact 8x8 block.
    #[test]
    fn test_upscale_blocks() {
        let result = Pipeline::new(cga())
            .target(32, 16)
            .adjustments(adj(0, 0, 0, 10))
            .run(&noise(64, 32, 6))
            .unwrap();
        assert_eq!(result.stage(), Stage::Done);

        let (low, high) = result.into_parts();
        assert_eq!((high.width(), high.height()), (low.width() * 8, low.height() * 8));
        for y in 0..high.height() {
            for x in 0..high.width() {
                assert_eq!(high.get(x, y), low.get(x / 8, y / 8));
            }
        }
    }

    // ========================================================================
    // Dithering
    // ========================================================================

    /// An already-exact pixel carries no error to the pixel below it.
    #[test]
    fn test_dither_leaves_exact_matches_alone() {
        let source = Raster::new(1, 2, vec![Rgb::WHITE, Rgb::BLACK]).unwrap();
        let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
        let result = Pipeline::new(palette)
            .target(1, 2)
            .adjustments(adj(0, 0, 0, 10))
            .run(&source)
            .unwrap();
        assert_eq!(result.mode(), QuantizeMode::Dither { strength: 1.0 });
        assert_eq!(result.low_res().pixels(), &[Rgb::WHITE, Rgb::BLACK]);
    }

    /// Every output pixel, dithered or not, is a palette color.
    #[test]
    fn test_output_restricted_to_palette() {
        let source = noise(128, 64, 7);
        for dithering in [-10, -3, 0, 4, 10] {
            let palette = cga();
            let result = Pipeline::new(palette.clone())
                .adjustments(adj(2, 3, -1, dithering))
                .run(&source)
                .unwrap();
            assert!(
                result.high_res().pixels().iter().all(|&p| palette.contains(p)),
                "dithering {dithering}"
            );
        }
    }

    /// Sign of the dithering amount does not matter, only its magnitude.
    #[test]
    fn test_dither_sign_irrelevant() {
        let source = noise(64, 32, 8);
        let run = |d| {
            Pipeline::new(cga())
                .adjustments(adj(0, 0, 0, d))
                .run(&source)
                .unwrap()
                .into_parts()
        };
        assert_eq!(run(-6), run(6));
    }

    // ========================================================================
    // Nearest-color tie-break
    // ========================================================================

    /// Equidistant entries resolve to palette order, every time.
    #[test]
    fn test_tie_break_follows_palette_order() {
        let dark = Rgb::new(100, 100, 90);
        let light = Rgb::new(100, 100, 110);
        let source = Raster::filled(4, 2, Rgb::new(100, 100, 100));

        for (first, second) in [(dark, light), (light, dark)] {
            let palette = Palette::new(&[first, second]).unwrap();
            for _ in 0..3 {
                let result = Pipeline::new(palette.clone()).target(4, 2).run(&source).unwrap();
                assert!(result.low_res().pixels().iter().all(|&p| p == first));
            }
        }
    }
}
