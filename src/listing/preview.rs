use std::ops::Range;
use std::path::PathBuf;

use image::imageops::FilterType;

use crate::config::ClusterConfig;
use crate::effects::{blur, composite, resample, transform};
use crate::foundation::core::{BlendOp, Gravity, Position};
use crate::foundation::error::FoundryResult;
use crate::surface::Surface;
use crate::workspace::StageContext;

/// Files written by one preview run, in cluster order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewReport {
    pub group_sizes: Vec<usize>,
    pub outputs: Vec<PathBuf>,
}

/// Split `count` images into consecutive cluster ranges.
pub fn plan_clusters(cfg: &ClusterConfig, count: usize) -> Vec<Range<usize>> {
    let mut start = 0;
    cfg.group_sizes_for(count)
        .into_iter()
        .map(|size| {
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Assemble one cluster onto a transparent canvas.
///
/// The first image fills the canvas. Every later image gets a drop shadow, is rotated by its
/// placement and lands at the canvas center shifted by the placement offset.
pub fn assemble_cluster(cfg: &ClusterConfig, images: &[Surface]) -> FoundryResult<Surface> {
    let mut canvas = Surface::new(cfg.width, cfg.height)?;
    let Some((first, rest)) = images.split_first() else {
        return Ok(canvas);
    };

    let background = resample::fill_area(first, cfg.width, cfg.height, FilterType::CatmullRom)?;
    composite::composite(&mut canvas, &background, BlendOp::Copy, Position::ORIGIN);

    for (i, image) in rest.iter().enumerate() {
        let placement = cfg.placement(i);
        let shadowed = blur::with_drop_shadow(image, &cfg.shadow)?;
        let rotated = transform::rotate(&shadowed, placement.rotation)?;
        composite::composite(
            &mut canvas,
            &rotated,
            BlendOp::Over,
            Position::Anchored(Gravity::Center, placement.offset()),
        );
    }
    Ok(canvas)
}

/// Build every preview cluster from the images in the configured input directory.
///
/// Clusters run in parallel and are numbered from 1 in cluster order. No input images means
/// nothing to do.
#[tracing::instrument(skip(ctx, cfg), fields(dir = %ctx.working_dir.display()))]
pub fn run_preview(ctx: &StageContext, cfg: &ClusterConfig) -> FoundryResult<PreviewReport> {
    cfg.validate()?;
    let sources = ctx.discover(&cfg.input_dir, &cfg.input)?;
    if sources.is_empty() {
        tracing::warn!(input = %cfg.input, "no preview sources; skipping preview stage");
        return Ok(PreviewReport::default());
    }

    let clusters = plan_clusters(cfg, sources.len());
    let outputs = ctx.run_parallel(&clusters, |i, range| {
        let images = sources[range.clone()]
            .iter()
            .map(Surface::load)
            .collect::<FoundryResult<Vec<_>>>()?;
        let mut canvas = assemble_cluster(cfg, &images)?;
        canvas.quality = Some(cfg.quality);

        let out = ctx.resolve(cfg.output_name(i + 1));
        canvas.write(&out)?;
        tracing::info!(path = %out.display(), images = images.len(), "wrote preview cluster");
        Ok(out)
    })?;

    Ok(PreviewReport {
        group_sizes: clusters.iter().map(|r| r.len()).collect(),
        outputs,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/listing/preview.rs"]
mod tests;
