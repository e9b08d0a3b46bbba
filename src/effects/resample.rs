//! Resizing, cropping and sharpening helpers built on `image::imageops`.

use image::imageops::{self, FilterType};

use crate::effects::composite;
use crate::foundation::core::{BlendOp, Gravity, Offset, Position, Rgba8};
use crate::foundation::error::{FoundryError, FoundryResult};
use crate::surface::Surface;

/// Resize to exactly `width`x`height`.
///
/// Resampling runs on premultiplied pixels; ringing filters can push a color above its alpha,
/// so colors are clamped back to the alpha afterwards.
pub fn resize_exact(
    src: &Surface,
    width: u32,
    height: u32,
    filter: FilterType,
) -> FoundryResult<Surface> {
    if width == 0 || height == 0 {
        return Err(FoundryError::config(format!(
            "resize target must be > 0 (got {width}x{height})"
        )));
    }
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }
    let resized = imageops::resize(&src.premul_view()?, width, height, filter);
    let mut out = Surface::from_premul_image(resized)?.with_hints_from(src);
    clamp_to_alpha(&mut out);
    Ok(out)
}

fn clamp_to_alpha(surface: &mut Surface) {
    for px in surface.data_mut().chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }
}

fn scaled(len: u32, factor: f64) -> u32 {
    ((f64::from(len) * factor).round() as u32).max(1)
}

/// Resize to `width`, keeping the aspect ratio.
pub fn scale_to_width(src: &Surface, width: u32, filter: FilterType) -> FoundryResult<Surface> {
    if width == 0 {
        return Err(FoundryError::config("resize width must be > 0"));
    }
    let factor = f64::from(width) / f64::from(src.width());
    resize_exact(src, width, scaled(src.height(), factor), filter)
}

/// Largest aspect-preserving size that fits in `max_w`x`max_h` (enlarging when smaller).
pub fn fit_within(
    src: &Surface,
    max_w: u32,
    max_h: u32,
    filter: FilterType,
) -> FoundryResult<Surface> {
    if max_w == 0 || max_h == 0 {
        return Err(FoundryError::config(format!(
            "fit target must be > 0 (got {max_w}x{max_h})"
        )));
    }
    let factor = (f64::from(max_w) / f64::from(src.width()))
        .min(f64::from(max_h) / f64::from(src.height()));
    let w = scaled(src.width(), factor).min(max_w);
    let h = scaled(src.height(), factor).min(max_h);
    resize_exact(src, w, h, filter)
}

/// Smallest aspect-preserving size covering `width`x`height`, with overflow to the right and
/// bottom cut off.
pub fn fill_area(
    src: &Surface,
    width: u32,
    height: u32,
    filter: FilterType,
) -> FoundryResult<Surface> {
    if width == 0 || height == 0 {
        return Err(FoundryError::config(format!(
            "fill target must be > 0 (got {width}x{height})"
        )));
    }
    let factor = (f64::from(width) / f64::from(src.width()))
        .max(f64::from(height) / f64::from(src.height()));
    let w = scaled(src.width(), factor).max(width);
    let h = scaled(src.height(), factor).max(height);
    let covered = resize_exact(src, w, h, filter)?;
    covered.crop(0, 0, width, height)
}

/// Keep the left `width_pct` / top `height_pct` percent of the surface.
pub fn crop_percent(src: &Surface, width_pct: f64, height_pct: f64) -> FoundryResult<Surface> {
    for pct in [width_pct, height_pct] {
        if !pct.is_finite() || pct <= 0.0 {
            return Err(FoundryError::config(format!(
                "crop percentage must be a finite value > 0 (got {pct})"
            )));
        }
    }
    let w = scaled(src.width(), width_pct.min(100.0) / 100.0);
    let h = scaled(src.height(), height_pct.min(100.0) / 100.0);
    src.crop(0, 0, w, h)
}

/// Cut or pad to exactly `width`x`height` around the center; padding uses `background`.
pub fn center_extent(
    src: &Surface,
    width: u32,
    height: u32,
    background: Rgba8,
) -> FoundryResult<Surface> {
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }
    let mut out = Surface::filled(width, height, background)?.with_hints_from(src);
    composite::composite(
        &mut out,
        src,
        BlendOp::Over,
        Position::Anchored(Gravity::Center, Offset::ZERO),
    );
    Ok(out)
}

/// Unsharp-mask sharpen with a one-pixel sigma.
pub fn sharpen(src: &Surface) -> FoundryResult<Surface> {
    let sharpened = imageops::unsharpen(&src.premul_view()?, 1.0, 0);
    let mut out = Surface::from_premul_image(sharpened)?.with_hints_from(src);
    clamp_to_alpha(&mut out);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/resample.rs"]
mod tests;
