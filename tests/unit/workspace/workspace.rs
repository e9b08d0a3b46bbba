use super::*;

#[test]
fn glob_match_wildcards() {
    assert!(glob_match("*.png", "tile.png"));
    assert!(glob_match("*.png", "TILE.PNG"));
    assert!(!glob_match("*.png", "tile.png.bak"));
    assert!(glob_match("image_??.jpeg", "image_01.jpeg"));
    assert!(!glob_match("image_??.jpeg", "image_1.jpeg"));
    assert!(glob_match("*", ""));
    assert!(glob_match("a*b*c", "aXXbYYc"));
    assert!(!glob_match("a*b*c", "aXXbYY"));
}

#[test]
fn discover_sorts_by_name_and_skips_directories() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.png", "a.png", "c.jpeg", "A2.PNG"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("d.png")).unwrap();

    let found = discover(dir.path(), "*.png").unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["A2.PNG", "a.png", "b.png"]);
}

#[test]
fn discover_in_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(discover(&dir.path().join("nope"), "*").unwrap().is_empty());
}

#[test]
fn stage_context_requires_existing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = StageContext::new(dir.path()).unwrap();
    assert_eq!(ctx.resolve("x.png"), dir.path().join("x.png"));
    assert!(
        StageContext::new(dir.path().join("missing"))
            .unwrap_err()
            .is_config()
    );
    assert!(StageContext::new("").unwrap_err().is_config());
}

#[test]
fn run_parallel_keeps_item_order() {
    let items: Vec<u32> = (0..32).collect();
    let out = run_parallel(Some(4), &items, |i, v| Ok((i, v * 2))).unwrap();
    for (i, (idx, doubled)) in out.into_iter().enumerate() {
        assert_eq!(idx, i);
        assert_eq!(doubled, i as u32 * 2);
    }
}

#[test]
fn run_parallel_reports_lowest_index_error_after_all_tasks() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let ran = AtomicUsize::new(0);
    let items: Vec<usize> = (0..10).collect();
    let err = run_parallel(Some(3), &items, |i, _| {
        ran.fetch_add(1, Ordering::SeqCst);
        if i == 7 || i == 3 {
            Err(FoundryError::write(format!("task {i}")))
        } else {
            Ok(i)
        }
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "write error: task 3");
    assert_eq!(ran.load(Ordering::SeqCst), 10);
}

#[test]
fn zero_threads_is_config_error() {
    let items = [1u8];
    assert!(
        run_parallel(Some(0), &items, |_, v| Ok(*v))
            .unwrap_err()
            .is_config()
    );
}
