use std::path::{Path, PathBuf};

use crate::compose::layer::build_layer;
use crate::config::ComposeConfig;
use crate::effects::composite;
use crate::foundation::core::Position;
use crate::foundation::error::FoundryResult;
use crate::surface::Surface;
use crate::text::TextEngine;
use crate::workspace::StageContext;

/// Paint every non-empty layer of `cfg`, in order, onto an opaque canvas.
///
/// Layers are built and composited one at a time because each blend may read the canvas
/// state left by the layers before it.
pub fn compose_surface(
    cfg: &ComposeConfig,
    base_dir: &Path,
    text: &TextEngine,
) -> FoundryResult<Surface> {
    cfg.validate()?;
    let mut canvas = Surface::filled(cfg.width, cfg.height, cfg.background)?;

    for (i, spec) in cfg.layers.iter().enumerate() {
        if spec.is_empty() {
            tracing::debug!(layer = i, "skipping empty layer");
            continue;
        }
        let layer = build_layer(spec, (cfg.width, cfg.height), base_dir, text)?;
        composite::composite(&mut canvas, &layer, spec.op, Position::ORIGIN);
    }
    Ok(canvas)
}

/// Compose `cfg` and write it to its output path inside the working directory.
#[tracing::instrument(skip(ctx, cfg, text), fields(output = %cfg.output.display()))]
pub fn run_compose(
    ctx: &StageContext,
    cfg: &ComposeConfig,
    text: &TextEngine,
) -> FoundryResult<PathBuf> {
    let canvas = compose_surface(cfg, &ctx.working_dir, text)?;
    let out = ctx.resolve(&cfg.output);
    canvas.write(&out)?;
    tracing::info!(path = %out.display(), layers = cfg.layers.len(), "composed");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/engine.rs"]
mod tests;
