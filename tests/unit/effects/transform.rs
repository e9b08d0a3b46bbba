use super::*;
use crate::foundation::core::Rgba8;

fn marked(w: u32, h: u32) -> Surface {
    let mut s = Surface::filled(w, h, Rgba8::WHITE).unwrap();
    s.put_pixel(0, 0, [255, 0, 0, 255]);
    s
}

#[test]
fn rotate_90_swaps_dimensions_and_moves_corner_clockwise() {
    let out = rotate(&marked(4, 2), 90.0).unwrap();
    assert_eq!(out.dimensions(), (2, 4));
    assert_eq!(out.pixel(1, 0), [255, 0, 0, 255]);
    assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
}

#[test]
fn rotate_negative_90_moves_corner_counter_clockwise() {
    let out = rotate(&marked(4, 2), -90.0).unwrap();
    assert_eq!(out.dimensions(), (2, 4));
    assert_eq!(out.pixel(0, 3), [255, 0, 0, 255]);
}

#[test]
fn rotate_full_turn_is_identity() {
    let src = marked(3, 5);
    assert_eq!(rotate(&src, 360.0).unwrap(), src);
    assert_eq!(rotate(&src, 0.0).unwrap(), src);
}

#[test]
fn rotate_45_enlarges_canvas_with_transparent_corners() {
    let src = Surface::filled(10, 10, Rgba8::WHITE).unwrap();
    let out = rotate(&src, 45.0).unwrap();
    assert_eq!(out.dimensions(), (15, 15));
    assert_eq!(out.pixel(0, 0)[3], 0);
    assert_eq!(out.pixel(7, 7), [255, 255, 255, 255]);
}

#[test]
fn rotate_rejects_non_finite_angle() {
    let src = marked(2, 2);
    assert!(rotate(&src, f64::NAN).unwrap_err().is_config());
}

#[test]
fn scale_rounds_and_keeps_at_least_one_pixel() {
    let src = Surface::filled(20, 10, Rgba8::WHITE).unwrap();
    assert_eq!(scale(&src, 50.0).unwrap().dimensions(), (10, 5));
    assert_eq!(scale(&src, 1.0).unwrap().dimensions(), (1, 1));
    assert!(scale(&src, 0.0).unwrap_err().is_config());
    assert!(scale(&src, -5.0).unwrap_err().is_config());
}

#[test]
fn rotate_then_scale_differs_from_scale_then_rotate() {
    let src = Surface::filled(20, 10, Rgba8::WHITE).unwrap();

    let rs = TransformPipeline {
        rotation: Some(30.0),
        scale: Some(25.0),
        distort: None,
    }
    .apply(src.clone())
    .unwrap();
    assert_eq!(rs.dimensions(), (6, 5));

    let sr = rotate(&scale(&src, 25.0).unwrap(), 30.0).unwrap();
    assert_eq!(sr.dimensions(), (6, 6));
}

#[test]
fn identity_distort_keeps_pixels() {
    let src = marked(8, 6);
    let points = [
        0.0, 0.0, 0.0, 0.0, //
        8.0, 0.0, 8.0, 0.0, //
        8.0, 6.0, 8.0, 6.0, //
        0.0, 6.0, 0.0, 6.0,
    ];
    let out = distort(&src, &points).unwrap();
    assert_eq!(out, src);
}

#[test]
fn distort_translation_shifts_content() {
    let src = marked(8, 8);
    let points = [
        0.0, 0.0, 2.0, 0.0, //
        8.0, 0.0, 10.0, 0.0, //
        8.0, 8.0, 10.0, 8.0, //
        0.0, 8.0, 2.0, 8.0,
    ];
    let out = distort(&src, &points).unwrap();
    assert_eq!(out.dimensions(), (8, 8));
    assert_eq!(out.pixel(2, 0), [255, 0, 0, 255]);
    assert_eq!(out.pixel(0, 0)[3], 0);
    assert_eq!(out.pixel(1, 4)[3], 0);
}

#[test]
fn distort_rejects_bad_point_counts() {
    let src = marked(4, 4);
    assert!(distort(&src, &[]).unwrap_err().is_config());
    assert!(distort(&src, &[0.0; 7]).unwrap_err().is_config());
    assert!(distort(&src, &[0.0; 10]).unwrap_err().is_config());
}

fn assert_shifted_right_by_two(out: &Surface) {
    assert_eq!(out.dimensions(), (8, 8));
    assert_eq!(out.pixel(2, 0), [255, 0, 0, 255]);
    assert_eq!(out.pixel(0, 0)[3], 0);
    assert_eq!(out.pixel(1, 4)[3], 0);
}

#[test]
fn single_pair_distort_translates() {
    let out = distort(&marked(8, 8), &[0.0, 0.0, 2.0, 0.0]).unwrap();
    assert_shifted_right_by_two(&out);
}

#[test]
fn two_pair_distort_fits_similarity() {
    let shifted = distort(&marked(8, 8), &[0.0, 0.0, 2.0, 0.0, 8.0, 0.0, 10.0, 0.0]).unwrap();
    assert_shifted_right_by_two(&shifted);

    let src = Surface::filled(8, 8, Rgba8::WHITE).unwrap();
    let halved = distort(&src, &[0.0, 0.0, 0.0, 0.0, 8.0, 0.0, 4.0, 0.0]).unwrap();
    assert_eq!(halved.pixel(1, 1), [255, 255, 255, 255]);
    assert_eq!(halved.pixel(2, 6)[3], 0);
    assert_eq!(halved.pixel(6, 6)[3], 0);
}

#[test]
fn three_pair_distort_fits_affine() {
    let points = [
        0.0, 0.0, 2.0, 0.0, //
        8.0, 0.0, 10.0, 0.0, //
        0.0, 8.0, 2.0, 8.0,
    ];
    assert_shifted_right_by_two(&distort(&marked(8, 8), &points).unwrap());

    // Output x samples source 2x; y is unchanged.
    let src = Surface::filled(8, 8, Rgba8::WHITE).unwrap();
    let stretched = distort(
        &src,
        &[0.0, 0.0, 0.0, 0.0, 8.0, 0.0, 4.0, 0.0, 0.0, 8.0, 0.0, 8.0],
    )
    .unwrap();
    assert_eq!(stretched.pixel(1, 6), [255, 255, 255, 255]);
    assert_eq!(stretched.pixel(6, 1)[3], 0);
}

#[test]
fn short_point_lists_reject_collinear_destinations() {
    let src = marked(4, 4);
    let collinear = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0];
    assert!(distort(&src, &collinear).unwrap_err().is_config());
    let repeated = [0.0, 0.0, 1.0, 1.0, 3.0, 3.0, 1.0, 1.0];
    assert!(distort(&src, &repeated).unwrap_err().is_config());
}

#[test]
fn distort_rejects_degenerate_points() {
    let src = marked(4, 4);
    assert!(distort(&src, &[0.0; 16]).unwrap_err().is_config());
}

#[test]
fn pipeline_validate_reports_bad_fields() {
    let bad = TransformPipeline {
        scale: Some(0.0),
        ..TransformPipeline::default()
    };
    assert!(bad.validate().is_err());
    assert!(TransformPipeline::default().is_identity());
    assert!(TransformPipeline::default().validate().is_ok());
}
