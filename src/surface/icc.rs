//! Minimal ICC v2 display profile describing sRGB.
//!
//! Primaries are the D50-adapted sRGB colorants; the tone curves are the piecewise sRGB
//! transfer function stored as a type-3 parametric curve.

use std::sync::OnceLock;

const DESCRIPTION: &str = "sRGB";
const COPYRIGHT: &str = "No copyright, use freely";

const D50: [f64; 3] = [0.9642, 1.0, 0.8249];
const RED: [f64; 3] = [0.4361, 0.2225, 0.0139];
const GREEN: [f64; 3] = [0.3851, 0.7169, 0.0971];
const BLUE: [f64; 3] = [0.1431, 0.0606, 0.7141];
/// `[g, a, b, c, d]` of `Y = (aX + b)^g` for `X >= d`, else `Y = cX`.
const SRGB_TRC: [f64; 5] = [2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045];

/// Encoded profile bytes, built once.
pub(crate) fn srgb_profile() -> Vec<u8> {
    static PROFILE: OnceLock<Vec<u8>> = OnceLock::new();
    PROFILE.get_or_init(build_srgb_profile).clone()
}

fn build_srgb_profile() -> Vec<u8> {
    let trc = para(SRGB_TRC);
    let tags: [(&[u8; 4], Vec<u8>); 9] = [
        (b"desc", desc(DESCRIPTION)),
        (b"cprt", text(COPYRIGHT)),
        (b"wtpt", xyz(D50)),
        (b"rXYZ", xyz(RED)),
        (b"gXYZ", xyz(GREEN)),
        (b"bXYZ", xyz(BLUE)),
        (b"rTRC", trc.clone()),
        (b"gTRC", trc.clone()),
        (b"bTRC", trc),
    ];

    let table_len = 4 + tags.len() * 12;
    let mut offset = 128 + table_len;
    let mut table = Vec::with_capacity(table_len);
    let mut body = Vec::new();
    table.extend_from_slice(&(tags.len() as u32).to_be_bytes());
    for (sig, data) in &tags {
        table.extend_from_slice(*sig);
        table.extend_from_slice(&(offset as u32).to_be_bytes());
        table.extend_from_slice(&(data.len() as u32).to_be_bytes());
        body.extend_from_slice(data);
        let padded = pad4(data.len());
        body.resize(body.len() + (padded - data.len()), 0);
        offset += padded;
    }

    let total = 128 + table.len() + body.len();
    let mut out = header(total as u32);
    out.extend_from_slice(&table);
    out.extend_from_slice(&body);
    out
}

fn header(size: u32) -> Vec<u8> {
    let mut h = Vec::with_capacity(128);
    h.extend_from_slice(&size.to_be_bytes());
    h.extend_from_slice(&[0; 4]); // preferred CMM
    h.extend_from_slice(&0x0210_0000u32.to_be_bytes());
    h.extend_from_slice(b"mntr");
    h.extend_from_slice(b"RGB ");
    h.extend_from_slice(b"XYZ ");
    h.extend_from_slice(&[0; 12]); // creation date
    h.extend_from_slice(b"acsp");
    h.extend_from_slice(&[0; 4]); // platform
    h.extend_from_slice(&[0; 4]); // flags
    h.extend_from_slice(&[0; 4]); // manufacturer
    h.extend_from_slice(&[0; 4]); // model
    h.extend_from_slice(&[0; 8]); // attributes
    h.extend_from_slice(&[0; 4]); // perceptual intent
    for v in D50 {
        h.extend_from_slice(&s15_fixed16(v));
    }
    h.extend_from_slice(&[0; 4]); // creator
    h.extend_from_slice(&[0; 16]); // profile id
    h.extend_from_slice(&[0; 28]);
    debug_assert_eq!(h.len(), 128);
    h
}

fn desc(s: &str) -> Vec<u8> {
    let mut d = Vec::new();
    d.extend_from_slice(b"desc");
    d.extend_from_slice(&[0; 4]);
    d.extend_from_slice(&((s.len() + 1) as u32).to_be_bytes());
    d.extend_from_slice(s.as_bytes());
    d.push(0);
    d.extend_from_slice(&[0; 4]); // unicode language
    d.extend_from_slice(&[0; 4]); // unicode count
    d.extend_from_slice(&[0; 2]); // scriptcode code
    d.push(0); // scriptcode count
    d.extend_from_slice(&[0; 67]);
    d
}

fn text(s: &str) -> Vec<u8> {
    let mut d = Vec::new();
    d.extend_from_slice(b"text");
    d.extend_from_slice(&[0; 4]);
    d.extend_from_slice(s.as_bytes());
    d.push(0);
    d
}

fn xyz(v: [f64; 3]) -> Vec<u8> {
    let mut d = Vec::with_capacity(20);
    d.extend_from_slice(b"XYZ ");
    d.extend_from_slice(&[0; 4]);
    for c in v {
        d.extend_from_slice(&s15_fixed16(c));
    }
    d
}

fn para(params: [f64; 5]) -> Vec<u8> {
    let mut d = Vec::with_capacity(32);
    d.extend_from_slice(b"para");
    d.extend_from_slice(&[0; 4]);
    d.extend_from_slice(&3u16.to_be_bytes());
    d.extend_from_slice(&[0; 2]);
    for v in params {
        d.extend_from_slice(&s15_fixed16(v));
    }
    d
}

fn s15_fixed16(v: f64) -> [u8; 4] {
    ((v * 65536.0).round() as i32).to_be_bytes()
}

fn pad4(n: usize) -> usize {
    n.div_ceil(4) * 4
}

#[cfg(test)]
#[path = "../../tests/unit/surface/icc.rs"]
mod tests;
