//! Seamless repeat-pattern previews.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;

use crate::config::PatternConfig;
use crate::effects::{montage, resample, transform};
use crate::foundation::core::Rgba8;
use crate::foundation::error::FoundryResult;
use crate::surface::{ColorProfile, Surface};
use crate::workspace::StageContext;

/// Copies per side of the repeat grid.
pub const GRID_SIDE: u32 = 3;

const UPSCALE_PERCENT: f64 = 200.0;

/// Files written for one source tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternOutput {
    /// 1-based discovery index used in the output names.
    pub index: usize,
    pub source: PathBuf,
    pub full: PathBuf,
    pub full_bytes: u64,
    pub preview: PathBuf,
    pub preview_bytes: u64,
}

/// Outputs of one tiler run, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternReport {
    pub outputs: Vec<PatternOutput>,
}

impl PatternReport {
    /// Outputs ordered by full-size byte count, largest first; equal sizes keep discovery order.
    pub fn largest_first(&self) -> Vec<&PatternOutput> {
        let mut sorted: Vec<&PatternOutput> = self.outputs.iter().collect();
        sorted.sort_by(|a, b| b.full_bytes.cmp(&a.full_bytes).then(a.index.cmp(&b.index)));
        sorted
    }

    /// On-disk bytes across every written file.
    pub fn total_bytes(&self) -> u64 {
        self.outputs
            .iter()
            .map(|o| o.full_bytes + o.preview_bytes)
            .sum()
    }
}

/// Sharpen (optionally), upscale by 200% and repeat the tile on a 3×3 grid.
pub fn tile_surface(src: &Surface, preprocess: bool) -> FoundryResult<Surface> {
    let prepared = if preprocess {
        resample::sharpen(src)?
    } else {
        src.clone()
    };
    let enlarged = transform::scale_with(&prepared, UPSCALE_PERCENT, FilterType::CatmullRom)?;
    let copies = [&enlarged; (GRID_SIDE * GRID_SIDE) as usize];
    montage::montage(&copies, GRID_SIDE, Rgba8::TRANSPARENT)
}

/// Turn every matching source tile into a full-size and a preview JPEG.
///
/// Tiles are processed in parallel, one task per file, numbered from 1 in discovery order.
#[tracing::instrument(skip(ctx, cfg), fields(dir = %ctx.working_dir.display()))]
pub fn run_pattern(ctx: &StageContext, cfg: &PatternConfig) -> FoundryResult<PatternReport> {
    cfg.validate()?;
    let sources = ctx.discover(".", &cfg.source)?;
    if sources.is_empty() {
        tracing::warn!(source = %cfg.source, "no pattern sources; skipping pattern stage");
        return Ok(PatternReport::default());
    }

    let processed_dir = ctx.resolve(&cfg.processed_dir);
    let preview_dir = ctx.resolve(&cfg.preview_dir);
    let outputs = ctx.run_parallel(&sources, |i, source| {
        process_tile(cfg, source, i + 1, &processed_dir, &preview_dir)
    })?;
    Ok(PatternReport { outputs })
}

fn process_tile(
    cfg: &PatternConfig,
    source: &Path,
    index: usize,
    processed_dir: &Path,
    preview_dir: &Path,
) -> FoundryResult<PatternOutput> {
    let tile = Surface::load(source)?;
    let grid = tile_surface(&tile, cfg.preprocess)?;

    let mut full = resample::fit_within(
        &grid,
        cfg.full_resolution,
        cfg.full_resolution,
        FilterType::CatmullRom,
    )?;
    full.dpi = Some(cfg.dpi);
    full.profile = Some(ColorProfile::Srgb);
    full.quality = Some(cfg.full_quality);
    let full_path = processed_dir.join(PatternConfig::full_name(index));
    full.write(&full_path)?;

    let mut preview = resample::fit_within(
        &full,
        cfg.preview_resolution,
        cfg.preview_resolution,
        FilterType::CatmullRom,
    )?;
    preview.quality = Some(cfg.preview_quality);
    let preview_path = preview_dir.join(PatternConfig::preview_name(index));
    preview.write(&preview_path)?;

    tracing::info!(
        source = %source.display(),
        full = %full_path.display(),
        preview = %preview_path.display(),
        "wrote pattern outputs"
    );
    Ok(PatternOutput {
        index,
        source: source.to_path_buf(),
        full_bytes: Surface::encoded_size(&full_path)?,
        full: full_path,
        preview_bytes: Surface::encoded_size(&preview_path)?,
        preview: preview_path,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pattern/pattern.rs"]
mod tests;
