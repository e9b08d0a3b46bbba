use super::*;

fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

#[test]
fn header_declares_total_size_and_signature() {
    let p = srgb_profile();
    assert_eq!(be_u32(&p[0..4]) as usize, p.len());
    assert_eq!(&p[36..40], b"acsp");
    assert_eq!(&p[12..16], b"mntr");
    assert_eq!(&p[16..20], b"RGB ");
    assert_eq!(p.len() % 4, 0);
}

#[test]
fn tag_table_entries_point_inside_profile() {
    let p = srgb_profile();
    let count = be_u32(&p[128..132]) as usize;
    assert_eq!(count, 9);
    let mut seen = Vec::new();
    for i in 0..count {
        let e = &p[132 + i * 12..132 + (i + 1) * 12];
        let offset = be_u32(&e[4..8]) as usize;
        let size = be_u32(&e[8..12]) as usize;
        assert_eq!(offset % 4, 0);
        assert!(offset + size <= p.len());
        seen.push(e[0..4].to_vec());
    }
    assert!(seen.contains(&b"rTRC".to_vec()));
    assert!(seen.contains(&b"wtpt".to_vec()));
}

#[test]
fn tone_curve_is_parametric_srgb() {
    let c = para(SRGB_TRC);
    assert_eq!(&c[0..4], b"para");
    assert_eq!(u16::from_be_bytes([c[8], c[9]]), 3);
    assert_eq!(c.len(), 12 + 5 * 4);

    let param = |i: usize| f64::from(be_u32(&c[12 + i * 4..16 + i * 4]) as i32) / 65536.0;
    let (g, a, b, lin, d) = (param(0), param(1), param(2), param(3), param(4));
    assert!((g - 2.4).abs() < 1e-4);
    assert!((d - 0.04045).abs() < 1e-4);

    let eval = |x: f64| if x >= d { (a * x + b).powf(g) } else { lin * x };
    assert!((eval(0.5) - 0.2140).abs() < 1e-3);
    assert!((eval(1.0) - 1.0).abs() < 1e-3);
    assert!((eval(0.02) - 0.02 / 12.92).abs() < 1e-4);
}

#[test]
fn every_trc_tag_carries_the_same_curve() {
    let p = srgb_profile();
    let count = be_u32(&p[128..132]) as usize;
    let expected = para(SRGB_TRC);
    let mut trcs = 0;
    for i in 0..count {
        let e = &p[132 + i * 12..132 + (i + 1) * 12];
        if e[1..4] == *b"TRC" {
            let offset = be_u32(&e[4..8]) as usize;
            let size = be_u32(&e[8..12]) as usize;
            assert_eq!(&p[offset..offset + size], expected.as_slice());
            trcs += 1;
        }
    }
    assert_eq!(trcs, 3);
}
