use rayon::prelude::*;

use crate::effects::composite;
use crate::foundation::core::{BlendOp, Offset, Position, Rgba8};
use crate::foundation::error::{FoundryError, FoundryResult};
use crate::foundation::math::mul_div255_u8;
use crate::surface::Surface;

/// Drop-shadow parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadowSpec {
    /// Gaussian sigma in pixels.
    pub sigma: f32,
    /// Shadow opacity in `[0, 1]`.
    pub opacity: f32,
    /// Shadow color (alpha is multiplied with `opacity`).
    pub color: Rgba8,
    /// Shadow displacement relative to the casting image.
    pub offset: Offset,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        Self {
            sigma: 25.0,
            opacity: 0.5,
            color: Rgba8::BLACK,
            offset: Offset::ZERO,
        }
    }
}

impl ShadowSpec {
    /// Transparent border added on every side so the blur has room to spread.
    pub fn margin(&self) -> u32 {
        (2.0 * self.sigma.max(0.0)).ceil() as u32
    }

    pub fn validate(&self) -> FoundryResult<()> {
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(FoundryError::config("shadow sigma must be finite and >= 0"));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(FoundryError::config("shadow opacity must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Return `src` sitting on its own blurred shadow.
///
/// The result is `src` enlarged by [`ShadowSpec::margin`] on each side, with the original
/// composited `Over` the shadow at the center.
pub fn with_drop_shadow(src: &Surface, spec: &ShadowSpec) -> FoundryResult<Surface> {
    spec.validate()?;
    let m = spec.margin();
    let (w, h) = (src.width() + 2 * m, src.height() + 2 * m);

    let mut plane = vec![0u8; (w as usize) * (h as usize)];
    let op = ((spec.opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let shade = mul_div255_u8(u16::from(spec.color.a), op);
    for y in 0..src.height() {
        let ty = i64::from(y + m) + i64::from(spec.offset.y);
        if ty < 0 || ty >= i64::from(h) {
            continue;
        }
        for x in 0..src.width() {
            let tx = i64::from(x + m) + i64::from(spec.offset.x);
            if tx < 0 || tx >= i64::from(w) {
                continue;
            }
            let a = src.pixel(x, y)[3];
            plane[ty as usize * w as usize + tx as usize] =
                mul_div255_u8(u16::from(a), u16::from(shade));
        }
    }

    let radius = (3.0 * spec.sigma).ceil() as u32;
    let blurred = blur_plane(&plane, w, h, radius, spec.sigma)?;

    let [r, g, b, _] = Rgba8 { a: 255, ..spec.color }.premul();
    let mut data = Vec::with_capacity(blurred.len() * 4);
    for a in blurred {
        data.extend_from_slice(&[
            mul_div255_u8(u16::from(r), u16::from(a)),
            mul_div255_u8(u16::from(g), u16::from(a)),
            mul_div255_u8(u16::from(b), u16::from(a)),
            a,
        ]);
    }
    let mut out = Surface::from_premul(w, h, data)?.with_hints_from(src);
    composite::composite(
        &mut out,
        src,
        BlendOp::Over,
        Position::At(Offset::new(m as i32, m as i32)),
    );
    Ok(out)
}

/// Separable Gaussian blur of a single 8-bit plane, edges clamped.
pub fn blur_plane(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> FoundryResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| FoundryError::config("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(FoundryError::config(
            "blur_plane expects src matching width*height",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> FoundryResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FoundryError::config("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = width as i64;
    dst.par_chunks_mut(width as usize)
        .zip(src.par_chunks(width as usize))
        .for_each(|(out_row, in_row)| {
            for x in 0..w {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i64 - radius).clamp(0, w - 1);
                    acc += u64::from(kw) * u64::from(in_row[sx as usize]);
                }
                out_row[x as usize] = q16_to_u8(acc);
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = width as usize;
    let h = height as i64;
    dst.par_chunks_mut(w).enumerate().for_each(|(y, out_row)| {
        for (x, out) in out_row.iter_mut().enumerate() {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y as i64 + ki as i64 - radius).clamp(0, h - 1);
                acc += u64::from(kw) * u64::from(src[sy as usize * w + x]);
            }
            *out = q16_to_u8(acc);
        }
    });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
