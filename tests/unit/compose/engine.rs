use super::*;
use crate::config::LayerSpec;
use crate::foundation::core::{BlendOp, Offset, Rgba8};

fn fixtures(dir: &Path) {
    Surface::filled(4, 4, Rgba8::opaque(255, 0, 0))
        .unwrap()
        .write(dir.join("red.png"))
        .unwrap();
    Surface::filled(4, 4, Rgba8::opaque(0, 0, 255))
        .unwrap()
        .write(dir.join("blue.png"))
        .unwrap();
}

fn layer(image: &str, x: i32, y: i32) -> LayerSpec {
    LayerSpec {
        image: Some(image.into()),
        offset: Offset::new(x, y),
        ..LayerSpec::default()
    }
}

fn config(layers: Vec<LayerSpec>) -> ComposeConfig {
    ComposeConfig {
        width: 12,
        height: 12,
        layers,
        ..ComposeConfig::default()
    }
}

#[test]
fn no_layers_gives_background() {
    let dir = tempfile::tempdir().unwrap();
    let out = compose_surface(&config(Vec::new()), dir.path(), &TextEngine::new(&[])).unwrap();
    assert_eq!(out, Surface::filled(12, 12, Rgba8::WHITE).unwrap());
}

#[test]
fn swapping_disjoint_layers_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    fixtures(dir.path());
    let text = TextEngine::new(&[]);

    let a = compose_surface(
        &config(vec![layer("red.png", 0, 0), layer("blue.png", 6, 6)]),
        dir.path(),
        &text,
    )
    .unwrap();
    let b = compose_surface(
        &config(vec![layer("blue.png", 6, 6), layer("red.png", 0, 0)]),
        dir.path(),
        &text,
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn swapping_overlapping_layers_changes_stacking() {
    let dir = tempfile::tempdir().unwrap();
    fixtures(dir.path());
    let text = TextEngine::new(&[]);

    let a = compose_surface(
        &config(vec![layer("red.png", 0, 0), layer("blue.png", 2, 2)]),
        dir.path(),
        &text,
    )
    .unwrap();
    let b = compose_surface(
        &config(vec![layer("blue.png", 2, 2), layer("red.png", 0, 0)]),
        dir.path(),
        &text,
    )
    .unwrap();
    assert_ne!(a, b);
    assert_eq!(a.pixel(3, 3), [0, 0, 255, 255]);
    assert_eq!(b.pixel(3, 3), [255, 0, 0, 255]);
}

#[test]
fn multiply_layer_darkens_accumulated_canvas() {
    let dir = tempfile::tempdir().unwrap();
    fixtures(dir.path());
    let mut top = layer("blue.png", 0, 0);
    top.op = BlendOp::Multiply;
    let out = compose_surface(
        &config(vec![layer("red.png", 0, 0), top]),
        dir.path(),
        &TextEngine::new(&[]),
    )
    .unwrap();
    assert_eq!(out.pixel(1, 1), [0, 0, 0, 255]);
    assert_eq!(out.pixel(8, 8), [255, 255, 255, 255]);
}

#[test]
fn run_compose_writes_output_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    fixtures(dir.path());
    let ctx = StageContext::new(dir.path()).unwrap();
    let cfg = ComposeConfig {
        output: "out/art.png".into(),
        ..config(vec![layer("red.png", 1, 1)])
    };
    let path = run_compose(&ctx, &cfg, &TextEngine::new(&[])).unwrap();
    assert_eq!(path, dir.path().join("out/art.png"));
    let back = Surface::load(&path).unwrap();
    assert_eq!(back.dimensions(), (12, 12));
    assert_eq!(back.pixel(1, 1), [255, 0, 0, 255]);
}
