//! Geometric transforms: rotate, scale, perspective distort.
//!
//! Every transform resamples premultiplied pixels bilinearly and treats everything outside the
//! source as transparent.

use image::imageops::FilterType;
use rayon::prelude::*;

use crate::effects::resample;
use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::{FoundryError, FoundryResult};
use crate::foundation::math::solve_linear;
use crate::surface::Surface;

/// Ordered geometric operations applied as rotate → scale → distort.
///
/// Absent operations are skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformPipeline {
    /// Clockwise rotation in degrees.
    pub rotation: Option<f64>,
    /// Scale as a percentage of the current size.
    pub scale: Option<f64>,
    /// Flat `[sx, sy, dx, dy, ...]` control points.
    pub distort: Option<Vec<f64>>,
}

impl TransformPipeline {
    pub fn is_identity(&self) -> bool {
        self.rotation.is_none() && self.scale.is_none() && self.distort.is_none()
    }

    pub fn validate(&self) -> FoundryResult<()> {
        if let Some(deg) = self.rotation
            && !deg.is_finite()
        {
            return Err(FoundryError::config("rotation must be finite"));
        }
        if let Some(pct) = self.scale {
            validate_scale(pct)?;
        }
        if let Some(points) = &self.distort {
            Perspective::from_control_points(points)?;
        }
        Ok(())
    }

    pub fn apply(&self, src: Surface) -> FoundryResult<Surface> {
        let mut out = src;
        if let Some(deg) = self.rotation {
            out = rotate(&out, deg)?;
        }
        if let Some(pct) = self.scale {
            out = scale(&out, pct)?;
        }
        if let Some(points) = &self.distort {
            out = distort(&out, points)?;
        }
        Ok(out)
    }
}

/// Rotate clockwise by `degrees`, enlarging the canvas to the rotated bounding box.
pub fn rotate(src: &Surface, degrees: f64) -> FoundryResult<Surface> {
    if !degrees.is_finite() {
        return Err(FoundryError::config("rotation must be finite"));
    }
    let norm = degrees.rem_euclid(360.0);
    let quarter = (norm / 90.0).round();
    if (norm - quarter * 90.0).abs() < 1e-9 {
        return rotate_quarters(src, quarter as u32 % 4);
    }

    let theta = degrees.to_radians();
    let (w, h) = (f64::from(src.width()), f64::from(src.height()));
    let (c, s) = (theta.cos().abs(), theta.sin().abs());
    let nw = ((w * c + h * s) - 1e-9).ceil().max(1.0) as u32;
    let nh = ((w * s + h * c) - 1e-9).ceil().max(1.0) as u32;

    let forward = Affine::translate(Vec2::new(f64::from(nw) / 2.0, f64::from(nh) / 2.0))
        * Affine::rotate(theta)
        * Affine::translate(Vec2::new(-w / 2.0, -h / 2.0));
    let inverse = forward.inverse();

    map_pixels(src, nw, nh, |p| Some(inverse * p))
}

fn rotate_quarters(src: &Surface, quarters: u32) -> FoundryResult<Surface> {
    let (w, h) = src.dimensions();
    let (nw, nh) = if quarters % 2 == 1 { (h, w) } else { (w, h) };
    let mut data = vec![0u8; src.byte_size()];
    for y in 0..nh {
        for x in 0..nw {
            let (sx, sy) = match quarters {
                1 => (y, h - 1 - x),
                2 => (w - 1 - x, h - 1 - y),
                3 => (w - 1 - y, x),
                _ => (x, y),
            };
            let di = ((y * nw + x) as usize) * 4;
            data[di..di + 4].copy_from_slice(&src.pixel(sx, sy));
        }
    }
    Ok(Surface::from_premul(nw, nh, data)?.with_hints_from(src))
}

fn validate_scale(pct: f64) -> FoundryResult<()> {
    if !pct.is_finite() || pct <= 0.0 {
        return Err(FoundryError::config(format!(
            "scale must be a finite percentage > 0 (got {pct})"
        )));
    }
    Ok(())
}

/// Resize to `pct` percent of the current size (at least one pixel per axis).
pub fn scale(src: &Surface, pct: f64) -> FoundryResult<Surface> {
    scale_with(src, pct, FilterType::Triangle)
}

pub fn scale_with(src: &Surface, pct: f64, filter: FilterType) -> FoundryResult<Surface> {
    validate_scale(pct)?;
    let nw = ((f64::from(src.width()) * pct / 100.0).round() as u32).max(1);
    let nh = ((f64::from(src.height()) * pct / 100.0).round() as u32).max(1);
    resample::resize_exact(src, nw, nh, filter)
}

/// Projective mapping fitted from control-point pairs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perspective {
    /// Row-major 3x3 matrix mapping normalized destination points to normalized source points.
    coeffs: [f64; 9],
    /// Coordinates are divided by this before the matrix is applied.
    norm: f64,
}

impl Perspective {
    /// Fit from a flat `[sx, sy, dx, dy, ...]` list.
    ///
    /// Four or more pairs fit a projective mapping in the least-squares sense. Fewer pairs fall
    /// back to simpler mappings: one pair translates, two pairs give a similarity (uniform scale,
    /// rotation and translation), three pairs give a full affine.
    pub fn from_control_points(points: &[f64]) -> FoundryResult<Self> {
        if points.is_empty() || !points.len().is_multiple_of(4) {
            return Err(FoundryError::config(format!(
                "distort control points must come in groups of 4 (sx, sy, dx, dy); got {} values",
                points.len()
            )));
        }
        if points.iter().any(|v| !v.is_finite()) {
            return Err(FoundryError::config(
                "distort control points must be finite",
            ));
        }
        let degenerate =
            || FoundryError::config("distort control points are degenerate (collinear or repeated)");

        let norm = points.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let norm = if norm == 0.0 { 1.0 } else { norm };
        let pairs: Vec<[f64; 4]> = points
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]].map(|v| v / norm))
            .collect();

        let coeffs = match pairs.len() {
            1 => {
                let [sx, sy, dx, dy] = pairs[0];
                [1.0, 0.0, sx - dx, 0.0, 1.0, sy - dy, 0.0, 0.0, 1.0]
            }
            2 => {
                let [a, b, tx, ty] = fit_least_squares(pairs.iter().flat_map(|&[sx, sy, dx, dy]| {
                    [([dx, -dy, 1.0, 0.0], sx), ([dy, dx, 0.0, 1.0], sy)]
                }))
                .ok_or_else(degenerate)?;
                [a, -b, tx, b, a, ty, 0.0, 0.0, 1.0]
            }
            3 => {
                let h = fit_least_squares(pairs.iter().flat_map(|&[sx, sy, dx, dy]| {
                    [
                        ([dx, dy, 1.0, 0.0, 0.0, 0.0], sx),
                        ([0.0, 0.0, 0.0, dx, dy, 1.0], sy),
                    ]
                }))
                .ok_or_else(degenerate)?;
                [h[0], h[1], h[2], h[3], h[4], h[5], 0.0, 0.0, 1.0]
            }
            _ => {
                let h = fit_least_squares(pairs.iter().flat_map(|&[sx, sy, dx, dy]| {
                    [
                        ([dx, dy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dy * sx], sx),
                        ([0.0, 0.0, 0.0, dx, dy, 1.0, -dx * sy, -dy * sy], sy),
                    ]
                }))
                .ok_or_else(degenerate)?;
                [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0]
            }
        };
        Ok(Self { coeffs, norm })
    }

    /// Source point for a destination point, `None` at the horizon.
    pub fn source_of(&self, p: Point) -> Option<Point> {
        let m = &self.coeffs;
        let (x, y) = (p.x / self.norm, p.y / self.norm);
        let den = m[6] * x + m[7] * y + m[8];
        if den.abs() < 1e-12 {
            return None;
        }
        Some(Point::new(
            (m[0] * x + m[1] * y + m[2]) / den * self.norm,
            (m[3] * x + m[4] * y + m[5]) / den * self.norm,
        ))
    }
}

/// Solve the normal equations for `rows` of `(coefficients, rhs)`.
fn fit_least_squares<const N: usize>(
    rows: impl Iterator<Item = ([f64; N], f64)>,
) -> Option<[f64; N]> {
    let mut ata = [[0.0f64; N]; N];
    let mut atb = [0.0f64; N];
    for (row, rhs) in rows {
        for i in 0..N {
            for j in 0..N {
                ata[i][j] += row[i] * row[j];
            }
            atb[i] += row[i] * rhs;
        }
    }
    solve_linear(ata, atb)
}

/// Perspective-distort within the current extent.
pub fn distort(src: &Surface, points: &[f64]) -> FoundryResult<Surface> {
    let persp = Perspective::from_control_points(points)?;
    map_pixels(src, src.width(), src.height(), |p| persp.source_of(p))
}

/// Build a `width`x`height` surface whose pixel centers sample `src` at `source_of(center)`.
fn map_pixels(
    src: &Surface,
    width: u32,
    height: u32,
    source_of: impl Fn(Point) -> Option<Point> + Sync,
) -> FoundryResult<Surface> {
    let mut out = Surface::new(width, height)?.with_hints_from(src);
    let stride = width as usize * 4;
    out.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width as usize {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some(sp) = source_of(center) {
                    let px = sample_bilinear(src, sp.x - 0.5, sp.y - 0.5);
                    row[x * 4..x * 4 + 4].copy_from_slice(&px);
                }
            }
        });
    Ok(out)
}

/// Bilinear sample at continuous pixel coordinates; outside pixels are transparent.
pub(crate) fn sample_bilinear(src: &Surface, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    if !x.is_finite() || !y.is_finite() || x <= -1.0 || y <= -1.0 || x >= w as f64 || y >= h as f64
    {
        return [0; 4];
    }
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let tx = x - x0 as f64;
    let ty = y - y0 as f64;

    let fetch = |xi: i64, yi: i64| -> [f64; 4] {
        if xi < 0 || yi < 0 || xi >= w || yi >= h {
            return [0.0; 4];
        }
        let p = src.pixel(xi as u32, yi as u32);
        [
            f64::from(p[0]),
            f64::from(p[1]),
            f64::from(p[2]),
            f64::from(p[3]),
        ]
    };

    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1, y0);
    let p01 = fetch(x0, y0 + 1);
    let p11 = fetch(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - tx) + p10[c] * tx;
        let bottom = p01[c] * (1.0 - tx) + p11[c] * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transform.rs"]
mod tests;
