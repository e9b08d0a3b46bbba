use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{ExtendedColorType, ImageEncoder};

use crate::foundation::error::{FoundryError, FoundryResult};
use crate::foundation::math::mul_div255_u8;
use crate::surface::{ColorProfile, Surface, icc};

pub(crate) const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub(crate) fn from_path(path: &Path) -> FoundryResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(FoundryError::config(format!(
                "unsupported output extension for '{}' (expected png, jpg or jpeg)",
                path.display()
            ))),
        }
    }
}

/// Encode `surface` to `path`, then flush and fsync before returning.
pub(crate) fn write_surface(surface: &Surface, path: &Path) -> FoundryResult<()> {
    let format = OutputFormat::from_path(path)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            FoundryError::write(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }

    let file = File::create(path)
        .map_err(|e| FoundryError::write(format!("create '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Png => encode_png(surface, &mut writer),
        OutputFormat::Jpeg => encode_jpeg(surface, &mut writer),
    }
    .map_err(|e| FoundryError::write(format!("encode '{}': {e}", path.display())))?;

    writer
        .flush()
        .map_err(|e| FoundryError::write(format!("flush '{}': {e}", path.display())))?;
    let file = writer
        .into_inner()
        .map_err(|e| FoundryError::write(format!("flush '{}': {}", path.display(), e.error())))?;
    file.sync_all()
        .map_err(|e| FoundryError::write(format!("sync '{}': {e}", path.display())))?;

    tracing::debug!(path = %path.display(), width = surface.width(), height = surface.height(), "surface written");
    Ok(())
}

fn encode_png<W: Write>(surface: &Surface, writer: &mut W) -> image::ImageResult<()> {
    let mut encoder = image::codecs::png::PngEncoder::new(writer);
    if surface.profile == Some(ColorProfile::Srgb) {
        encoder
            .set_icc_profile(icc::srgb_profile())
            .map_err(image::ImageError::Unsupported)?;
    }
    let rgba = surface.to_rgba_image();
    encoder.write_image(
        rgba.as_raw(),
        surface.width(),
        surface.height(),
        ExtendedColorType::Rgba8,
    )
}

fn encode_jpeg<W: Write>(surface: &Surface, writer: &mut W) -> image::ImageResult<()> {
    let quality = surface
        .quality
        .unwrap_or(DEFAULT_JPEG_QUALITY)
        .clamp(1, 100);
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality);
    if let Some(dpi) = surface.dpi {
        encoder.set_pixel_density(image::codecs::jpeg::PixelDensity::dpi(dpi));
    }
    if surface.profile == Some(ColorProfile::Srgb) {
        encoder
            .set_icc_profile(icc::srgb_profile())
            .map_err(image::ImageError::Unsupported)?;
    }
    let rgb = flatten_over_white(surface);
    encoder.write_image(
        &rgb,
        surface.width(),
        surface.height(),
        ExtendedColorType::Rgb8,
    )
}

/// Straight RGB8 with alpha composited over opaque white.
pub(crate) fn flatten_over_white(surface: &Surface) -> Vec<u8> {
    let mut out = Vec::with_capacity(surface.data().len() / 4 * 3);
    for px in surface.data().chunks_exact(4) {
        let inv = 255u16 - u16::from(px[3]);
        let white = mul_div255_u8(255, inv);
        for &c in &px[..3] {
            out.push(c.saturating_add(white));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/encode.rs"]
mod tests;
