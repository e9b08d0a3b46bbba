use std::path::PathBuf;

use image::imageops::FilterType;

use crate::config::{LabelSpec, PrimaryMontageConfig};
use crate::effects::{composite, montage, resample};
use crate::foundation::core::{BlendOp, Gravity, Offset, Position};
use crate::foundation::error::{FoundryError, FoundryResult};
use crate::surface::Surface;
use crate::text::TextEngine;
use crate::workspace::StageContext;

/// Percentage of each image's width kept as its strip: `100 / (count / rows)`.
///
/// The division `count / rows` is integral, as is the grid.
pub fn strip_percent(count: usize, rows: u32) -> FoundryResult<f64> {
    let per_row = count / rows.max(1) as usize;
    if per_row == 0 {
        return Err(FoundryError::config(format!(
            "{count} image(s) cannot fill {rows} montage row(s)"
        )));
    }
    Ok(100.0 / per_row as f64)
}

/// Strip-crop, tile, resize and crop the previews into the primary canvas.
pub fn assemble_montage(
    cfg: &PrimaryMontageConfig,
    images: &[Surface],
) -> FoundryResult<Surface> {
    let pct = strip_percent(images.len(), cfg.rows)?;
    let strips = images
        .iter()
        .map(|img| resample::crop_percent(img, pct, 100.0))
        .collect::<FoundryResult<Vec<_>>>()?;

    let tiled = montage::montage(&strips, cfg.columns, cfg.background)?;
    let resized = resample::scale_to_width(&tiled, cfg.width, FilterType::CatmullRom)?;
    resample::center_extent(&resized, cfg.width, cfg.height, cfg.background)
}

/// Build the primary listing image and write it with maximum quality.
///
/// Uses the first `columns × rows` images from the input directory. The label text is the
/// listing's short title, falling back to the configured label text; blank text draws no label.
#[tracing::instrument(skip(ctx, cfg, text, short_title), fields(dir = %ctx.working_dir.display()))]
pub fn run_primary(
    ctx: &StageContext,
    cfg: &PrimaryMontageConfig,
    short_title: Option<&str>,
    text: &TextEngine,
) -> FoundryResult<Option<PathBuf>> {
    cfg.validate()?;
    let mut sources = ctx.discover(&cfg.input_dir, &cfg.input)?;
    if sources.is_empty() {
        tracing::warn!(input = %cfg.input, "no preview images; skipping primary stage");
        return Ok(None);
    }
    sources.truncate(cfg.tile_count());

    let images = sources
        .iter()
        .map(Surface::load)
        .collect::<FoundryResult<Vec<_>>>()?;
    let mut canvas = assemble_montage(cfg, &images)?;

    if let Some(overlay) = &cfg.overlay {
        let frame = Surface::load(ctx.resolve(overlay))?;
        let frame = resample::scale_to_width(&frame, canvas.width(), FilterType::CatmullRom)?;
        composite::composite(
            &mut canvas,
            &frame,
            BlendOp::Over,
            Position::Anchored(Gravity::Center, Offset::ZERO),
        );
    }

    let label = LabelSpec {
        text: short_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| cfg.label.text.clone()),
        ..cfg.label.clone()
    };
    if let Some(caption) = text.render(&label, &ctx.working_dir)? {
        composite::composite(
            &mut canvas,
            &caption,
            BlendOp::Over,
            Position::Anchored(label.gravity, label.offset),
        );
    }

    canvas.quality = Some(100);
    let out = ctx.resolve(&cfg.output);
    canvas.write(&out)?;
    tracing::info!(path = %out.display(), tiles = images.len(), "wrote primary listing image");
    Ok(Some(out))
}

#[cfg(test)]
#[path = "../../tests/unit/listing/primary.rs"]
mod tests;
