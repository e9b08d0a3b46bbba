use super::*;

fn marked_tile() -> Surface {
    let mut s = Surface::filled(6, 4, Rgba8::WHITE).unwrap();
    for y in 0..2 {
        for x in 0..2 {
            s.put_pixel(x, y, [255, 0, 0, 255]);
        }
    }
    s
}

fn output(index: usize, full_bytes: u64) -> PatternOutput {
    PatternOutput {
        index,
        source: PathBuf::from(format!("src_{index}.png")),
        full: PathBuf::new(),
        full_bytes,
        preview: PathBuf::new(),
        preview_bytes: 1,
    }
}

#[test]
fn tile_grid_holds_nine_upscaled_copies() {
    let grid = tile_surface(&marked_tile(), false).unwrap();
    assert_eq!(grid.dimensions(), (36, 24));
    for row in 0..3 {
        for col in 0..3 {
            let (x, y) = (col * 12, row * 8);
            assert_eq!(grid.pixel(x, y), [255, 0, 0, 255]);
            assert_eq!(grid.pixel(x + 10, y + 6), [255, 255, 255, 255]);
        }
    }
}

#[test]
fn preprocessing_keeps_grid_geometry() {
    let grid = tile_surface(&marked_tile(), true).unwrap();
    assert_eq!(grid.dimensions(), (36, 24));
    assert!(!grid.is_fully_transparent());
}

#[test]
fn largest_first_breaks_ties_by_lower_index() {
    let report = PatternReport {
        outputs: vec![output(1, 50), output(2, 80), output(3, 50), output(4, 10)],
    };
    let order: Vec<usize> = report.largest_first().iter().map(|o| o.index).collect();
    assert_eq!(order, vec![2, 1, 3, 4]);
    assert_eq!(report.total_bytes(), 194);
}
