//! File-level conversion: decode, pick a palette, run the pipeline, encode.
//!
//! A conversion either writes all of its outputs or none of them: every
//! image is encoded in memory first, then staged next to its target and
//! renamed into place once every file is written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pixel_quant::{Palette, QuantizeMode, Raster};

use crate::catalog::{PaletteCatalog, PaletteChoice};
use crate::config::ConvertOptions;
use crate::error::AppError;
use crate::io;

/// One input image and where its results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Also write the un-upscaled image here
    pub low_res_output: Option<PathBuf>,
}

impl ConvertJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            low_res_output: None,
        }
    }

    pub fn with_low_res(mut self, path: impl Into<PathBuf>) -> Self {
        self.low_res_output = Some(path.into());
        self
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub low_res_output: Option<PathBuf>,
    /// Catalog name, or `auto`
    pub palette_name: String,
    pub palette: Palette,
    pub mode: QuantizeMode,
    pub low_res_size: (usize, usize),
    pub high_res_size: (usize, usize),
    /// Bytes written for the upscaled image
    pub bytes: usize,
}

/// Pick the run's palette: a catalog entry, or one extracted from `source`.
pub fn select_palette(
    source: &Raster,
    options: &ConvertOptions,
    catalog: &PaletteCatalog,
) -> Result<(String, Palette), AppError> {
    match catalog.resolve(&options.palette)? {
        PaletteChoice::Named(named) => Ok((named.name, named.palette)),
        PaletteChoice::Auto => {
            let quantizer = options.quantizer();
            let palette = match options.seed {
                Some(seed) => quantizer.extract_seeded(source, seed)?,
                None => quantizer.extract(source, &mut rand::thread_rng())?,
            };
            tracing::debug!(
                colors = ?palette.to_hex_strings(),
                seed = ?options.seed,
                "Extracted palette from image"
            );
            Ok((crate::catalog::AUTO_PALETTE.to_string(), palette))
        }
    }
}

/// Convert a single file.
///
/// Runs synchronously; use [`convert_batch`] from async code.
pub fn convert_file(
    job: &ConvertJob,
    options: &ConvertOptions,
    catalog: &PaletteCatalog,
) -> Result<ConvertReport, AppError> {
    let source = io::decode_file(&job.input)?;
    let (palette_name, palette) = select_palette(&source, options, catalog)?;

    let conversion = options.pipeline(palette.clone()).run(&source)?;
    tracing::debug!(
        input = %job.input.display(),
        width = conversion.low_res().width(),
        height = conversion.low_res().height(),
        mode = ?conversion.mode(),
        "Pipeline finished"
    );

    let high_png = io::encode_png(conversion.high_res(), Some(&palette))?;
    let low_png = match job.low_res_output {
        Some(_) => Some(io::encode_png(conversion.low_res(), Some(&palette))?),
        None => None,
    };

    let mut outputs = vec![(job.output.as_path(), high_png.as_slice())];
    if let (Some(path), Some(bytes)) = (&job.low_res_output, &low_png) {
        outputs.push((path.as_path(), bytes.as_slice()));
    }
    write_all_or_nothing(&outputs)?;

    let report = ConvertReport {
        input: job.input.clone(),
        output: job.output.clone(),
        low_res_output: job.low_res_output.clone(),
        palette_name,
        palette,
        mode: conversion.mode(),
        low_res_size: size_of(conversion.low_res()),
        high_res_size: size_of(conversion.high_res()),
        bytes: high_png.len(),
    };
    tracing::info!(
        input = %report.input.display(),
        output = %report.output.display(),
        width = report.high_res_size.0,
        height = report.high_res_size.1,
        palette = %report.palette_name,
        "Converted image"
    );
    Ok(report)
}

/// Convert independent files concurrently.
///
/// Each image runs on the blocking pool, at most `max_parallel` at a time.
/// Results come back in job order; one failure does not stop the others.
pub async fn convert_batch(
    jobs: Vec<ConvertJob>,
    options: Arc<ConvertOptions>,
    catalog: Arc<PaletteCatalog>,
    max_parallel: usize,
) -> Vec<(ConvertJob, Result<ConvertReport, AppError>)> {
    let semaphore = Arc::new(tokio::sync::Semaphore::new(max_parallel.max(1)));
    let mut handles = Vec::with_capacity(jobs.len());

    for job in jobs {
        let options = options.clone();
        let catalog = catalog.clone();
        let semaphore = semaphore.clone();
        let task_job = job.clone();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return Err(AppError::Task(e.to_string())),
            };
            match tokio::task::spawn_blocking(move || convert_file(&task_job, &options, &catalog))
                .await
            {
                Ok(result) => result,
                Err(e) => Err(AppError::Task(format!("Conversion task failed: {e}"))),
            }
        });
        handles.push((job, handle));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (job, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(AppError::Task(e.to_string())),
        };
        if let Err(ref e) = result {
            tracing::warn!(input = %job.input.display(), %e, "Conversion failed");
        }
        results.push((job, result));
    }
    results
}

/// Write every output or none of them.
///
/// Each file is first written to a hidden sibling and renamed into place only
/// once all of them are on disk. Any failure removes what was staged.
fn write_all_or_nothing(outputs: &[(&Path, &[u8])]) -> Result<(), AppError> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());
    for (i, &(path, bytes)) in outputs.iter().enumerate() {
        match stage(path, bytes, i) {
            Ok(tmp) => staged.push((tmp, path)),
            Err(e) => {
                discard(staged.iter().map(|(tmp, _)| tmp.as_path()));
                return Err(e);
            }
        }
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            discard(staged[i..].iter().map(|(tmp, _)| tmp.as_path()));
            discard(staged[..i].iter().map(|(_, path)| *path));
            return Err(AppError::io(*path, e));
        }
    }
    Ok(())
}

fn stage(path: &Path, bytes: &[u8], slot: usize) -> Result<PathBuf, AppError> {
    let file_name = path.file_name().ok_or_else(|| {
        AppError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }

    let tmp_name = format!(
        ".{}.{}-{slot}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    );
    let tmp = match parent {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    };
    if let Err(e) = std::fs::write(&tmp, bytes) {
        discard(std::iter::once(tmp.as_path()));
        return Err(AppError::io(path, e));
    }
    Ok(tmp)
}

fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::debug!(path = %path.display(), %e, "Could not remove partial output");
        }
    }
}

fn size_of(raster: &Raster) -> (usize, usize) {
    (raster.width(), raster.height())
}
