use crate::assets::AssetLoader;
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub retention: RetentionConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub dither: DitherConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where palettes and artifacts live
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_palettes_dir")]
    pub palettes_dir: PathBuf,

    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
}

fn default_palettes_dir() -> PathBuf {
    PathBuf::from("./palettes")
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            palettes_dir: default_palettes_dir(),
            artifacts_dir: default_artifacts_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetentionConfig {
    /// Artifact files kept by a sweep, across all identities
    #[serde(default = "default_keep_last")]
    pub keep_last: usize,
}

fn default_keep_last() -> usize {
    20
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            keep_last: default_keep_last(),
        }
    }
}

/// Source image limits, checked before a full decode
#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,

    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
}

fn default_max_source_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_max_source_pixels() -> u64 {
    50_000_000
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: default_max_source_bytes(),
            max_source_pixels: default_max_source_pixels(),
        }
    }
}

/// Palette distance selection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceSetting {
    /// HyAB for chromatic palettes, Euclidean otherwise
    #[default]
    Auto,
    Euclidean,
    Hyab,
}

/// Quantization algorithm
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmSetting {
    #[default]
    FloydSteinberg,
    /// Nearest palette color, no error diffusion
    None,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DitherConfig {
    #[serde(default)]
    pub algorithm: AlgorithmSetting,

    #[serde(default)]
    pub serpentine: bool,

    #[serde(default = "default_error_clamp")]
    pub error_clamp: f32,

    #[serde(default)]
    pub distance: DistanceSetting,
}

fn default_error_clamp() -> f32 {
    0.5
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmSetting::FloydSteinberg,
            serpentine: false,
            error_clamp: default_error_clamp(),
            distance: DistanceSetting::Auto,
        }
    }
}

/// Which panel driver backs the dispatcher
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// No panel attached; dispatch reports the driver as unavailable
    #[default]
    None,
    /// Writes each frame to `simulated_output`
    Simulated,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default)]
    pub driver: DriverKind,

    /// Palette index the panel is cleared to before a frame is shown
    #[serde(default = "default_clear_color")]
    pub clear_color: u8,

    #[serde(default = "default_simulated_output")]
    pub simulated_output: PathBuf,
}

fn default_clear_color() -> u8 {
    1
}

fn default_simulated_output() -> PathBuf {
    PathBuf::from("./panel-frame.bin")
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            driver: DriverKind::None,
            clear_color: default_clear_color(),
            simulated_output: default_simulated_output(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => Self::parse_or_default(&content),
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML, falling back to defaults when it does not deserialize
    pub fn parse_or_default(content: &str) -> Self {
        match serde_yaml::from_str::<Self>(content) {
            Ok(config) => {
                tracing::info!(
                    palettes = %config.storage.palettes_dir.display(),
                    artifacts = %config.storage.artifacts_dir.display(),
                    driver = ?config.display.driver,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }
}
