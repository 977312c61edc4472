//! Asset loading with embedded fallbacks
//!
//! Default palettes and the default config are compiled into the binary:
//!
//! - If no config path is given: the embedded `config.yaml` is used
//! - If a palettes directory is missing or empty: it is seeded with the embedded palettes
//! - `inkpress init` extracts embedded assets for customization

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default palette tables
#[derive(RustEmbed)]
#[folder = "palettes/"]
#[include = "*.act"]
struct EmbeddedPalettes;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Palettes,
    Config,
}

/// Report of seeding operations
#[derive(Debug, Default)]
pub struct SeedReport {
    pub palettes_seeded: Vec<String>,
    pub config_seeded: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.palettes_seeded.is_empty() && !self.config_seeded
    }
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem locations
pub struct AssetLoader {
    /// Palette directory to seed or extract into
    palettes_dir: Option<PathBuf>,
    /// External config file path (from `--config` / CONFIG_FILE)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Paths should be `Some` only if they were configured.
    /// With `None`, embedded assets are used exclusively.
    pub fn new(palettes_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            palettes_dir,
            config_file,
        }
    }

    pub fn with_palettes_dir(mut self, dir: PathBuf) -> Self {
        self.palettes_dir = Some(dir);
        self
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Raw bytes of an embedded palette
    pub fn embedded_palette(name: &str) -> Option<Cow<'static, [u8]>> {
        EmbeddedPalettes::get(name).map(|f| f.data)
    }

    /// Check if a directory exists and is empty (ignoring .gitkeep)
    fn is_empty_dir(path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        path.read_dir()
            .map(|mut entries| {
                entries.all(|e| {
                    e.map(|entry| entry.file_name() == ".gitkeep")
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Seed a missing or empty palettes directory and a missing config file
    ///
    /// Only touches locations that were configured. A directory that already
    /// holds anything is left alone.
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(ref dir) = self.palettes_dir {
            if !dir.exists() || Self::is_empty_dir(dir) {
                fs::create_dir_all(dir)?;
                for file in EmbeddedPalettes::iter() {
                    if let Some(data) = EmbeddedPalettes::get(&file) {
                        fs::write(dir.join(file.as_ref()), &*data.data)?;
                        report.palettes_seeded.push(file.to_string());
                    }
                }
                if !report.palettes_seeded.is_empty() {
                    tracing::info!(
                        dir = %dir.display(),
                        count = report.palettes_seeded.len(),
                        "Seeded palettes directory with embedded palettes"
                    );
                }
            }
        }

        if let Some(ref path) = self.config_file {
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                if let Some(data) = EmbeddedConfig::get("config.yaml") {
                    fs::write(path, &*data.data)?;
                    report.config_seeded = true;
                    tracing::info!(path = %path.display(), "Seeded config file with embedded default");
                }
            }
        }

        Ok(report)
    }

    /// Extract embedded assets to filesystem (init command)
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            match category {
                AssetCategory::Palettes => {
                    let dir = self
                        .palettes_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./palettes"));
                    fs::create_dir_all(&dir)?;

                    for file in EmbeddedPalettes::iter() {
                        let path = dir.join(file.as_ref());
                        if !force && path.exists() {
                            report.skipped.push(path.display().to_string());
                            continue;
                        }
                        if let Some(data) = EmbeddedPalettes::get(&file) {
                            fs::write(&path, &*data.data)?;
                            report.written.push(path.display().to_string());
                        }
                    }
                }
                AssetCategory::Config => {
                    let path = self
                        .config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./config.yaml"));

                    if !force && path.exists() {
                        report.skipped.push(path.display().to_string());
                        continue;
                    }
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    if let Some(data) = EmbeddedConfig::get("config.yaml") {
                        fs::write(&path, &*data.data)?;
                        report.written.push(path.display().to_string());
                    }
                }
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Palettes => {
                let mut names: Vec<String> =
                    EmbeddedPalettes::iter().map(|s| s.to_string()).collect();
                names.sort();
                names
            }
            AssetCategory::Config => vec!["config.yaml".to_string()],
        }
    }
}
