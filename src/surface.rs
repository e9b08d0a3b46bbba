//! In-memory raster buffers.
//!
//! A [`Surface`] stores **premultiplied** RGBA8 pixels in row-major order. Straight alpha only
//! appears at the decode and encode boundaries.

pub(crate) mod encode;
pub(crate) mod icc;

use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{FoundryError, FoundryResult};
use crate::foundation::math::unpremul;

/// Premultiplied pixels of a [`Surface`] borrowed as an `image` buffer.
pub(crate) type PremulView<'a> = image::ImageBuffer<image::Rgba<u8>, &'a [u8]>;

/// Color profile tag attached to a surface and embedded on write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColorProfile {
    /// IEC 61966-2-1 sRGB.
    Srgb,
}

/// Raster image with encode hints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
    /// JPEG quality hint, `1..=100`. Ignored by lossless formats.
    pub quality: Option<u8>,
    /// Color profile embedded on write.
    pub profile: Option<ColorProfile>,
    /// Pixel density hint in dots per inch.
    pub dpi: Option<u16>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> FoundryResult<Self> {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Surface filled with a straight-alpha color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> FoundryResult<Self> {
        let len = buffer_len(width, height)?;
        let px = color.premul();
        let mut data = Vec::with_capacity(len);
        for _ in 0..(len / 4) {
            data.extend_from_slice(&px);
        }
        Ok(Self::from_parts(width, height, data))
    }

    /// Wrap an existing premultiplied RGBA8 buffer.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> FoundryResult<Self> {
        if data.len() != buffer_len(width, height)? {
            return Err(FoundryError::config(
                "surface buffer must match width*height*4",
            ));
        }
        Ok(Self::from_parts(width, height, data))
    }

    /// Convert a straight-alpha image into a surface.
    pub fn from_rgba_image(img: image::RgbaImage) -> FoundryResult<Self> {
        let (width, height) = img.dimensions();
        buffer_len(width, height)?;
        let mut data = img.into_raw();
        premultiply_in_place(&mut data);
        Ok(Self::from_parts(width, height, data))
    }

    /// Decode an encoded image held in memory.
    pub fn decode(bytes: &[u8]) -> FoundryResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .map_err(|e| FoundryError::decode(format!("decode image from memory: {e}")))?;
        Self::from_rgba_image(dyn_img.to_rgba8())
    }

    /// Load and decode an image file.
    ///
    /// A missing file is a configuration error; unreadable bytes are a decode error.
    pub fn load(path: impl AsRef<Path>) -> FoundryResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FoundryError::config(format!(
                "source image '{}' does not exist",
                path.display()
            )));
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image bytes from '{}'", path.display()))?;
        Self::decode(&bytes).map_err(|e| match e {
            FoundryError::Decode(msg) => {
                FoundryError::decode(format!("'{}': {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Encode to `path` (format from the extension) and return once the bytes are on disk.
    pub fn write(&self, path: impl AsRef<Path>) -> FoundryResult<()> {
        encode::write_surface(self, path.as_ref())
    }

    /// On-disk size of an already written file.
    pub fn encoded_size(path: impl AsRef<Path>) -> FoundryResult<u64> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)
            .with_context(|| format!("stat written file '{}'", path.display()))?;
        Ok(meta.len())
    }

    fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
            quality: None,
            profile: None,
            dpi: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the in-memory pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Copy the encode hints of `other` onto this surface.
    pub fn with_hints_from(mut self, other: &Surface) -> Self {
        self.quality = other.quality;
        self.profile = other.profile;
        self.dpi = other.dpi;
        self
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut raw = self.data.clone();
        for px in raw.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul(px[0], a);
            px[1] = unpremul(px[1], a);
            px[2] = unpremul(px[2], a);
        }
        image::RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Premultiplied pixels viewed as an image buffer, for resampling.
    /// Borrowed premultiplied view for `imageops`, without copying the pixels.
    pub(crate) fn premul_view(&self) -> FoundryResult<PremulView<'_>> {
        image::ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
            .ok_or_else(|| FoundryError::config("surface buffer must match width*height*4"))
    }

    pub(crate) fn from_premul_image(img: image::RgbaImage) -> FoundryResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_premul(w, h, img.into_raw())
    }

    /// Copy out the intersection of `(x, y, width, height)` with this surface.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> FoundryResult<Self> {
        let x0 = x.min(self.width);
        let y0 = y.min(self.height);
        let w = width.min(self.width - x0);
        let h = height.min(self.height - y0);
        if w == 0 || h == 0 {
            return Err(FoundryError::config(format!(
                "crop {width}x{height}+{x}+{y} is empty on a {}x{} surface",
                self.width, self.height
            )));
        }

        let mut out = Vec::with_capacity(buffer_len(w, h)?);
        let stride = self.width as usize * 4;
        for row in y0..(y0 + h) {
            let start = row as usize * stride + x0 as usize * 4;
            out.extend_from_slice(&self.data[start..start + w as usize * 4]);
        }
        Ok(Self::from_parts(w, h, out).with_hints_from(self))
    }

    /// Bounding box `(x0, y0, x1, y1)` (exclusive end) of pixels matching `pred`.
    pub fn bounds_where(&self, pred: impl Fn([u8; 4]) -> bool) -> Option<(u32, u32, u32, u32)> {
        let mut b: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if !pred(self.pixel(x, y)) {
                    continue;
                }
                b = Some(match b {
                    None => (x, y, x + 1, y + 1),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
                });
            }
        }
        b
    }

    /// Bounding box of pixels with non-zero alpha.
    pub fn content_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        self.bounds_where(|px| px[3] != 0)
    }

    /// `true` when every pixel is fully transparent.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

pub(crate) fn buffer_len(width: u32, height: u32) -> FoundryResult<usize> {
    if width == 0 || height == 0 {
        return Err(FoundryError::config(format!(
            "surface dimensions must be > 0 (got {width}x{height})"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| FoundryError::config("surface buffer size overflow"))
}

fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../tests/unit/surface/surface.rs"]
mod tests;
