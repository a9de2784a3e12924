//! Test images and scratch directories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory that holds inputs and receives outputs.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Horizontal red-to-blue gradient with a vertical green ramp.
    pub fn gradient(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            let r = (255 * x / width.max(1)) as u8;
            let g = (255 * y / height.max(1)) as u8;
            image::Rgb([r, g, 255 - r])
        });
        let path = self.path(name);
        img.save(&path).expect("Failed to write gradient fixture");
        path
    }

    /// Left half black, right half white.
    pub fn two_tone(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let img = image::RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        let path = self.path(name);
        img.save(&path).expect("Failed to write two-tone fixture");
        path
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }
}

/// A user palette file with one new palette and one override.
pub const USER_PALETTES: &str = r##"
palettes:
  - name: Mono
    colors: ["#000000", "#FFFFFF"]
  - name: gameboy
    colors: ["#0F380F", "#306230", "#8BAC0F", "#9BBC0F"]
"##;
