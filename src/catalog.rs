//! Named palette catalog
//!
//! The built-in palettes ship as `assets/palettes.yaml`, embedded in the
//! binary and parsed once per process. A user file with the same layout can
//! add palettes or replace built-in ones by name:
//!
//! - `--palettes <path>` on the command line, or
//! - the `PALETTES_FILE` environment variable.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pixel_quant::Palette;
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::error::AppError;

/// Embedded palette definitions
#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.yaml"]
struct EmbeddedAssets;

const BUILTIN_FILE: &str = "palettes.yaml";

/// Pseudo-palette that is extracted from the source image.
pub const AUTO_PALETTE: &str = "auto";
const AUTO_PALETTE_LABEL: &str = "Auto (From Image)";

/// PNG palettes cannot index more entries than this.
const MAX_COLORS: usize = 256;

static BUILTIN: OnceLock<PaletteCatalog> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    palettes: Vec<PaletteEntry>,
}

#[derive(Debug, Deserialize)]
struct PaletteEntry {
    name: String,
    colors: Vec<String>,
}

/// A palette with its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPalette {
    pub name: String,
    pub palette: Palette,
}

/// What a `--palette` argument resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteChoice {
    Named(NamedPalette),
    /// Extract a palette from the source image.
    Auto,
}

/// Ordered, immutable set of named palettes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteCatalog {
    entries: Vec<NamedPalette>,
}

impl PaletteCatalog {
    /// The palettes compiled into the binary.
    pub fn builtin() -> Result<&'static PaletteCatalog, AppError> {
        if let Some(catalog) = BUILTIN.get() {
            return Ok(catalog);
        }
        let file = EmbeddedAssets::get(BUILTIN_FILE)
            .ok_or_else(|| AppError::Catalog(format!("embedded {BUILTIN_FILE} missing")))?;
        let content = std::str::from_utf8(&file.data)
            .map_err(|e| AppError::Catalog(format!("embedded {BUILTIN_FILE}: {e}")))?;
        let parsed = Self::from_yaml(content)?;
        Ok(BUILTIN.get_or_init(|| parsed))
    }

    /// Built-in palettes merged with an optional user file.
    ///
    /// `override_path` wins over `PALETTES_FILE`.
    pub fn load(override_path: Option<&Path>) -> Result<PaletteCatalog, AppError> {
        let builtin = Self::builtin()?.clone();
        let user_file = override_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("PALETTES_FILE").ok().map(PathBuf::from));

        match user_file {
            Some(path) => {
                let user = Self::from_file(&path)?;
                tracing::info!(
                    path = %path.display(),
                    palettes = user.len(),
                    "Loaded user palettes"
                );
                Ok(builtin.merged(user))
            }
            None => Ok(builtin),
        }
    }

    /// Parse a catalog document.
    pub fn from_yaml(content: &str) -> Result<PaletteCatalog, AppError> {
        let file: CatalogFile =
            serde_yaml::from_str(content).map_err(|e| AppError::Catalog(e.to_string()))?;

        let mut catalog = PaletteCatalog::default();
        for entry in file.palettes {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Catalog("palette with empty name".to_string()));
            }
            if is_auto(&name) {
                return Err(AppError::Catalog(format!("'{name}' is reserved")));
            }
            if entry.colors.len() > MAX_COLORS {
                return Err(AppError::Catalog(format!(
                    "{name}: {} colors (max {MAX_COLORS})",
                    entry.colors.len()
                )));
            }
            let palette = Palette::from_hex(entry.colors.as_slice())
                .map_err(|e| AppError::Catalog(format!("{name}: {e}")))?;
            catalog.insert(NamedPalette { name, palette });
        }
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<PaletteCatalog, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// `self` with every palette of `other` added; same-named entries are
    /// replaced in place, new ones appended in `other`'s order.
    pub fn merged(mut self, other: PaletteCatalog) -> PaletteCatalog {
        for entry in other.entries {
            self.insert(entry);
        }
        self
    }

    fn insert(&mut self, entry: NamedPalette) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(&entry.name))
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&NamedPalette> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a user-supplied palette name.
    pub fn resolve(&self, name: &str) -> Result<PaletteChoice, AppError> {
        if is_auto(name) {
            return Ok(PaletteChoice::Auto);
        }
        self.get(name)
            .cloned()
            .map(PaletteChoice::Named)
            .ok_or_else(|| AppError::UnknownPalette(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedPalette> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether `name` selects the image-derived palette.
pub fn is_auto(name: &str) -> bool {
    let name = name.trim();
    name.eq_ignore_ascii_case(AUTO_PALETTE) || name.eq_ignore_ascii_case(AUTO_PALETTE_LABEL)
}
