//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Frame detection settings
    pub detect: DetectSettings,
    /// OCR settings
    pub ocr: OcrSettings,
    /// Verification settings
    pub verify: VerifySettings,
}

/// Registration frame detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectSettings {
    /// Minimum candidate area as a fraction of the image
    pub min_area_ratio: f64,
    /// Maximum candidate area as a fraction of the image
    pub max_area_ratio: f64,
    /// Polygon approximation tolerance as a fraction of perimeter
    pub approx_epsilon: f64,
    /// Fixed binarization threshold (adaptive when unset)
    pub threshold: Option<u8>,
}

impl Default for DetectSettings {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.0005,
            max_area_ratio: 0.5,
            approx_epsilon: 0.02,
            threshold: None,
        }
    }
}

/// OCR settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Tesseract language code (e.g. "eng")
    pub language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}

/// Verification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySettings {
    /// Path to the local hash database (JSON)
    pub database: Option<PathBuf>,
    /// Verify against the claimed URL over the network
    pub remote: bool,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            database: None,
            remote: false,
        }
    }
}

/// Default location for the config file
pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("io", "certiscan", "certiscan")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ScanConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &ScanConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
