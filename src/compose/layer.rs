use std::path::Path;

use crate::config::LayerSpec;
use crate::effects::composite;
use crate::foundation::core::{BlendOp, Position};
use crate::foundation::error::FoundryResult;
use crate::surface::Surface;
use crate::text::TextEngine;

/// Build one finished layer on a transparent `canvas`-sized surface.
///
/// Order: image at its offset, label at its gravity, rotate → scale → distort on the whole
/// layer, then the alpha mask. A layer with neither image nor label stays fully transparent.
/// Relative paths resolve against `base_dir`.
#[tracing::instrument(skip(spec, base_dir, text), fields(image = ?spec.image))]
pub fn build_layer(
    spec: &LayerSpec,
    canvas: (u32, u32),
    base_dir: &Path,
    text: &TextEngine,
) -> FoundryResult<Surface> {
    spec.validate()?;
    let mut layer = Surface::new(canvas.0, canvas.1)?;

    if let Some(image) = &spec.image {
        let src = Surface::load(base_dir.join(image))?;
        composite::composite(&mut layer, &src, BlendOp::Over, Position::At(spec.offset));
    }

    if let Some(label) = &spec.label
        && let Some(caption) = text.render(label, base_dir)?
    {
        composite::composite(
            &mut layer,
            &caption,
            BlendOp::Over,
            Position::Anchored(label.gravity, label.offset),
        );
    }

    let transforms = spec.transforms();
    if !transforms.is_identity() {
        layer = transforms.apply(layer)?;
    }

    if let Some(mask) = &spec.mask {
        let mask = Surface::load(base_dir.join(mask))?;
        composite::apply_alpha_mask(&mut layer, &mask);
    }

    Ok(layer)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layer.rs"]
mod tests;
