use std::path::PathBuf;

use crate::config::listing::{validate_glob, validate_quality};
use crate::foundation::error::{FoundryError, FoundryResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Settings for the repeat-pattern tiler.
pub struct PatternConfig {
    /// File-name glob selecting source tiles in the working directory.
    #[serde(default = "default_source")]
    pub source: String,
    /// Sharpen each tile before upscaling.
    #[serde(default = "default_preprocess")]
    pub preprocess: bool,
    /// Longest edge of the full-size output.
    #[serde(default = "default_full_resolution")]
    pub full_resolution: u32,
    #[serde(default = "default_full_quality")]
    pub full_quality: u8,
    /// Longest edge of the preview output.
    #[serde(default = "default_preview_resolution")]
    pub preview_resolution: u32,
    #[serde(default = "default_preview_quality")]
    pub preview_quality: u8,
    /// Pixel density tag written into both outputs.
    #[serde(default = "default_dpi")]
    pub dpi: u16,
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
    #[serde(default = "default_preview_dir")]
    pub preview_dir: PathBuf,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            preprocess: default_preprocess(),
            full_resolution: default_full_resolution(),
            full_quality: default_full_quality(),
            preview_resolution: default_preview_resolution(),
            preview_quality: default_preview_quality(),
            dpi: default_dpi(),
            processed_dir: default_processed_dir(),
            preview_dir: default_preview_dir(),
        }
    }
}

impl PatternConfig {
    pub fn validate(&self) -> FoundryResult<()> {
        validate_glob(&self.source)?;
        if self.full_resolution == 0 || self.preview_resolution == 0 {
            return Err(FoundryError::config("pattern resolutions must be > 0"));
        }
        if self.dpi == 0 {
            return Err(FoundryError::config("pattern dpi must be > 0"));
        }
        validate_quality(self.full_quality)?;
        validate_quality(self.preview_quality)
    }

    /// Full-size output name for the 1-based discovery `index`.
    pub fn full_name(index: usize) -> String {
        format!("image_{index:03}_fullsize.jpeg")
    }

    /// Preview output name for the 1-based discovery `index`.
    pub fn preview_name(index: usize) -> String {
        format!("image_{index:03}_preview.jpeg")
    }
}

fn default_source() -> String {
    "*.png".to_string()
}

fn default_preprocess() -> bool {
    true
}

fn default_full_resolution() -> u32 {
    3600
}

fn default_full_quality() -> u8 {
    100
}

fn default_preview_resolution() -> u32 {
    1024
}

fn default_preview_quality() -> u8 {
    75
}

fn default_dpi() -> u16 {
    300
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("processed")
}

fn default_preview_dir() -> PathBuf {
    PathBuf::from("preview")
}
