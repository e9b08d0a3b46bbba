use super::*;
use crate::foundation::core::Rgba8;

fn chars(s: &str) -> f32 {
    s.chars().count() as f32
}

#[test]
fn wrap_lines_is_greedy() {
    let lines = wrap_lines("the quick brown fox jumps", Some(10.0), chars);
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
}

#[test]
fn wrap_lines_keeps_long_words_whole() {
    let lines = wrap_lines("a extraordinarily b", Some(5.0), chars);
    assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
}

#[test]
fn wrap_lines_honors_newlines_and_no_width() {
    assert_eq!(
        wrap_lines("one two\nthree", None, chars),
        vec!["one two", "three"]
    );
    assert_eq!(
        wrap_lines("one two\nthree four", Some(7.0), chars),
        vec!["one two", "three", "four"]
    );
}

#[test]
fn escape_xml_covers_markup_characters() {
    assert_eq!(
        escape_xml(r#"Tom & "Jerry" <3 'x'"#),
        "Tom &amp; &quot;Jerry&quot; &lt;3 &apos;x&apos;"
    );
}

#[test]
fn line_column_maps_rows_to_middle() {
    assert_eq!(line_column(Gravity::SouthEast), Gravity::East);
    assert_eq!(line_column(Gravity::North), Gravity::Center);
    assert_eq!(line_column(Gravity::NorthWest), Gravity::West);
}

#[test]
fn blank_label_renders_nothing() {
    let engine = TextEngine::new(&[]);
    let label = LabelSpec {
        text: "   ".to_string(),
        ..LabelSpec::default()
    };
    assert!(engine.render(&label, Path::new(".")).unwrap().is_none());
}

#[test]
fn bounded_label_takes_box_size() {
    let engine = TextEngine::new(&[]);
    let label = LabelSpec {
        text: "Summer <Sale> & more".to_string(),
        size: 20.0,
        color: Rgba8::opaque(200, 0, 0),
        width: Some(120),
        height: Some(40),
        ..LabelSpec::default()
    };
    let surface = engine.render(&label, Path::new(".")).unwrap().unwrap();
    assert_eq!(surface.dimensions(), (120, 40));
}

#[test]
fn unbounded_label_height_follows_line_count() {
    let engine = TextEngine::new(&[]);
    let label = LabelSpec {
        text: "first\nsecond".to_string(),
        size: 10.0,
        ..LabelSpec::default()
    };
    let surface = engine.render(&label, Path::new(".")).unwrap().unwrap();
    assert_eq!(surface.height(), 24);
    assert!(surface.width() >= 1);
}

#[test]
fn invalid_label_is_rejected_before_layout() {
    let engine = TextEngine::new(&[]);
    let label = LabelSpec {
        text: "x".to_string(),
        size: 0.0,
        ..LabelSpec::default()
    };
    assert!(engine.render(&label, Path::new(".")).unwrap_err().is_config());
}

#[test]
fn unknown_font_name_falls_back_to_family_lookup() {
    let engine = TextEngine::new(&[]);
    let (_, family) = engine
        .resolve_font(Some("Definitely Not A Font"), Path::new("."))
        .unwrap();
    assert_eq!(family, "Definitely Not A Font");
    let (_, family) = engine.resolve_font(None, Path::new(".")).unwrap();
    assert_eq!(family, "sans-serif");
}
