//! Blend operators and surface-onto-surface compositing.

use rayon::prelude::*;

use crate::foundation::core::{BlendOp, Position};
use crate::foundation::math::{add_sat_u8, luma, mul_div255_u8, unpremul};
use crate::surface::Surface;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Premultiplied multiply: `Sc·Dc + Sc·(1−Da) + Dc·(1−Sa)`.
pub fn multiply(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let (sa, da) = (u32::from(src[3]), u32::from(dst[3]));
    let mut out = [0u8; 4];
    for i in 0..3 {
        let (s, d) = (u32::from(src[i]), u32::from(dst[i]));
        let v = s * d + s * (255 - da) + d * (255 - sa);
        out[i] = ((v + 127) / 255).min(255) as u8;
    }
    out[3] = union_alpha(sa, da);
    out
}

/// Premultiplied screen: `Sc + Dc − Sc·Dc`.
pub fn screen(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let mut out = [0u8; 4];
    for i in 0..3 {
        let (s, d) = (u32::from(src[i]), u32::from(dst[i]));
        out[i] = (s + d - (s * d + 127) / 255).min(255) as u8;
    }
    out[3] = union_alpha(u32::from(src[3]), u32::from(dst[3]));
    out
}

/// Replace the alpha of `dst` with the mask coverage of `src`, keeping `dst`'s straight color.
pub fn copy_alpha(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let new_a = mask_coverage(src);
    let old_a = dst[3];
    let mut out = [0u8; 4];
    for i in 0..3 {
        let straight = unpremul(dst[i], old_a);
        out[i] = mul_div255_u8(u16::from(straight), u16::from(new_a));
    }
    out[3] = new_a;
    out
}

/// Coverage a mask pixel contributes: straight luminance scaled by its alpha.
pub fn mask_coverage(px: PremulRgba8) -> u8 {
    let a = px[3];
    if a == 0 {
        return 0;
    }
    let l = luma(unpremul(px[0], a), unpremul(px[1], a), unpremul(px[2], a));
    mul_div255_u8(u16::from(l), u16::from(a))
}

fn union_alpha(sa: u32, da: u32) -> u8 {
    (sa + da - (sa * da + 127) / 255).min(255) as u8
}

pub fn blend(op: BlendOp, dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match op {
        BlendOp::Over => over(dst, src, 1.0),
        BlendOp::Copy => src,
        BlendOp::Multiply => multiply(dst, src),
        BlendOp::Screen => screen(dst, src),
        BlendOp::CopyAlpha => copy_alpha(dst, src),
    }
}

/// Composite `overlay` onto `base` in place. Pixels of the overlay that fall outside the base
/// are clipped; base pixels outside the overlay's footprint are untouched.
pub fn composite(base: &mut Surface, overlay: &Surface, op: BlendOp, position: Position) {
    let (ox, oy) = position.resolve(base.dimensions(), overlay.dimensions());
    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));
    let (sw, sh) = (i64::from(overlay.width()), i64::from(overlay.height()));

    let x0 = ox.max(0);
    let y0 = oy.max(0);
    let x1 = (ox + sw).min(bw);
    let y1 = (oy + sh).min(bh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let base_stride = base.width() as usize * 4;
    let src_stride = overlay.width() as usize * 4;
    let src = overlay.data();
    let rows = &mut base.data_mut()[y0 as usize * base_stride..y1 as usize * base_stride];
    rows.par_chunks_mut(base_stride)
        .enumerate()
        .for_each(|(r, row)| {
            let s_row = (y0 + r as i64 - oy) as usize * src_stride;
            for x in x0..x1 {
                let di = x as usize * 4;
                let si = s_row + (x - ox) as usize * 4;
                let d = [row[di], row[di + 1], row[di + 2], row[di + 3]];
                let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                row[di..di + 4].copy_from_slice(&blend(op, d, s));
            }
        });
}

/// Turn every pure-black pixel fully transparent.
pub fn chroma_key_black(surface: &mut Surface) {
    for px in surface.data_mut().chunks_exact_mut(4) {
        if px[3] != 0 && px[0] == 0 && px[1] == 0 && px[2] == 0 {
            px[3] = 0;
        }
    }
}

/// Chroma-key a copy of `mask` and copy its coverage into the alpha of `target`.
pub fn apply_alpha_mask(target: &mut Surface, mask: &Surface) {
    let mut keyed = mask.clone();
    chroma_key_black(&mut keyed);
    composite(target, &keyed, BlendOp::CopyAlpha, Position::ORIGIN);
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
