use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::LabelSpec;
use crate::effects::blur::ShadowSpec;
use crate::foundation::core::{Gravity, Offset, Rgba8};
use crate::foundation::error::{FoundryError, FoundryResult};

/// Placeholder replaced by the 1-based cluster number in output names.
pub const CLUSTER_NUMBER_TOKEN: &str = "{n}";

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Offset and rotation applied to one intra-cluster position.
pub struct Placement {
    /// Offset from the canvas center.
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
}

impl Placement {
    pub const fn new(x: i32, y: i32, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    pub fn offset(&self) -> Offset {
        Offset::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Settings for the clustered preview assembler.
pub struct ClusterConfig {
    #[serde(default = "default_listing_width")]
    pub width: u32,
    #[serde(default = "default_listing_height")]
    pub height: u32,
    /// Remaining image count → size of the next cluster. Unlisted counts take one image.
    #[serde(default = "default_group_sizes")]
    pub group_sizes: BTreeMap<u32, u32>,
    /// Per-position placement for images after the first, indexed and clamped to the last entry.
    #[serde(default = "default_placements")]
    pub placements: Vec<Placement>,
    /// Directory holding the source previews, relative to the working directory.
    #[serde(default = "default_preview_dir")]
    pub input_dir: PathBuf,
    /// File-name glob selecting the source previews.
    #[serde(default = "default_preview_glob")]
    pub input: String,
    /// Output file-name template; `{n}` is replaced by the cluster number.
    #[serde(default = "default_cluster_output")]
    pub output: String,
    #[serde(default)]
    pub shadow: ShadowSpec,
    #[serde(default = "default_max_quality")]
    pub quality: u8,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            width: default_listing_width(),
            height: default_listing_height(),
            group_sizes: default_group_sizes(),
            placements: default_placements(),
            input_dir: default_preview_dir(),
            input: default_preview_glob(),
            output: default_cluster_output(),
            shadow: ShadowSpec::default(),
            quality: default_max_quality(),
        }
    }
}

impl ClusterConfig {
    /// Size of the next cluster when `remaining` images are left (never more than `remaining`).
    pub fn group_size(&self, remaining: usize) -> usize {
        let listed = u32::try_from(remaining)
            .ok()
            .and_then(|n| self.group_sizes.get(&n))
            .copied()
            .unwrap_or(1);
        (listed as usize).clamp(1, remaining.max(1))
    }

    /// Cluster sizes for `count` images, looking the table up again for every remainder.
    pub fn group_sizes_for(&self, count: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut remaining = count;
        while remaining > 0 {
            let size = self.group_size(remaining);
            out.push(size);
            remaining -= size;
        }
        out
    }

    /// Placement for the `index`-th image after the cluster background (0-based).
    pub fn placement(&self, index: usize) -> Placement {
        self.placements
            .get(index)
            .or_else(|| self.placements.last())
            .copied()
            .unwrap_or(Placement::new(0, 0, 0.0))
    }

    /// Output file name for the 1-based cluster `number`.
    pub fn output_name(&self, number: usize) -> String {
        self.output.replace(CLUSTER_NUMBER_TOKEN, &number.to_string())
    }

    pub fn validate(&self) -> FoundryResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FoundryError::config("preview canvas width/height must be > 0"));
        }
        if self.group_sizes.values().any(|v| *v == 0) {
            return Err(FoundryError::config("preview group sizes must be > 0"));
        }
        if self.placements.is_empty() {
            return Err(FoundryError::config(
                "preview placements must contain at least one entry",
            ));
        }
        if self.placements.iter().any(|p| !p.rotation.is_finite()) {
            return Err(FoundryError::config("preview placement rotation must be finite"));
        }
        if !self.output.contains(CLUSTER_NUMBER_TOKEN) {
            return Err(FoundryError::config(format!(
                "preview output '{}' must contain '{CLUSTER_NUMBER_TOKEN}'",
                self.output
            )));
        }
        validate_glob(&self.input)?;
        validate_quality(self.quality)?;
        self.shadow.validate()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Settings for the primary listing image.
pub struct PrimaryMontageConfig {
    #[serde(default = "default_listing_width")]
    pub width: u32,
    #[serde(default = "default_listing_height")]
    pub height: u32,
    /// Tile grid columns.
    #[serde(default = "default_montage_columns")]
    pub columns: u32,
    /// Tile grid rows.
    #[serde(default = "default_montage_rows")]
    pub rows: u32,
    /// Frame image resized to the canvas width and centered over the montage.
    #[serde(default)]
    pub overlay: Option<PathBuf>,
    /// Style of the short-title label. Its text is used only when no short title is supplied.
    #[serde(default = "default_primary_label")]
    pub label: LabelSpec,
    #[serde(default = "default_preview_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_preview_glob")]
    pub input: String,
    #[serde(default = "default_primary_output")]
    pub output: PathBuf,
    /// Montage cell background.
    #[serde(default = "default_montage_background")]
    pub background: Rgba8,
}

impl Default for PrimaryMontageConfig {
    fn default() -> Self {
        Self {
            width: default_listing_width(),
            height: default_listing_height(),
            columns: default_montage_columns(),
            rows: default_montage_rows(),
            overlay: None,
            label: default_primary_label(),
            input_dir: default_preview_dir(),
            input: default_preview_glob(),
            output: default_primary_output(),
            background: default_montage_background(),
        }
    }
}

impl PrimaryMontageConfig {
    /// Number of preview images the grid consumes.
    pub fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn validate(&self) -> FoundryResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FoundryError::config("primary canvas width/height must be > 0"));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(FoundryError::config("primary montage columns/rows must be > 0"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(FoundryError::config("primary output path must be non-empty"));
        }
        validate_glob(&self.input)?;
        self.label.validate()
    }
}

pub(crate) fn validate_glob(pattern: &str) -> FoundryResult<()> {
    if pattern.trim().is_empty() {
        return Err(FoundryError::config("file glob must be non-empty"));
    }
    if pattern.contains(['/', '\\']) {
        return Err(FoundryError::config(format!(
            "file glob '{pattern}' must match file names only"
        )));
    }
    Ok(())
}

pub(crate) fn validate_quality(quality: u8) -> FoundryResult<()> {
    if !(1..=100).contains(&quality) {
        return Err(FoundryError::config(format!(
            "quality must be within 1..=100 (got {quality})"
        )));
    }
    Ok(())
}

fn default_listing_width() -> u32 {
    2700
}

fn default_listing_height() -> u32 {
    2050
}

fn default_group_sizes() -> BTreeMap<u32, u32> {
    BTreeMap::from([
        (16, 3),
        (13, 3),
        (12, 4),
        (10, 3),
        (8, 4),
        (7, 3),
        (4, 4),
    ])
}

fn default_placements() -> Vec<Placement> {
    vec![
        Placement::new(-1024, 1000, -32.0),
        Placement::new(1024, 1000, -65.0),
        Placement::new(-30, -1500, 37.0),
    ]
}

fn default_preview_dir() -> PathBuf {
    PathBuf::from("preview")
}

fn default_preview_glob() -> String {
    "*.jpeg".to_string()
}

fn default_cluster_output() -> String {
    "etsy_product_listing_image_{n}.jpeg".to_string()
}

fn default_max_quality() -> u8 {
    100
}

fn default_montage_columns() -> u32 {
    10
}

fn default_montage_rows() -> u32 {
    1
}

fn default_primary_label() -> LabelSpec {
    LabelSpec {
        size: 125.0,
        weight: 500,
        gravity: Gravity::West,
        ..LabelSpec::default()
    }
}

fn default_primary_output() -> PathBuf {
    PathBuf::from("etsy_product_listing_1.jpeg")
}

fn default_montage_background() -> Rgba8 {
    Rgba8::WHITE
}
