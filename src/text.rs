//! Caption rasterization.
//!
//! Labels are laid out as an SVG `<text>` document and rendered with `resvg`, so font matching
//! and shaping follow `usvg`'s text pipeline.

use std::path::Path;
use std::sync::Arc;

use crate::config::LabelSpec;
use crate::foundation::core::{Gravity, Offset};
use crate::foundation::error::{FoundryError, FoundryResult};
use crate::surface::Surface;

const DEFAULT_FAMILY: &str = "sans-serif";
const LINE_HEIGHT: f32 = 1.2;
const DESCENT: f32 = 0.25;

/// Font database plus the label renderer built on it.
#[derive(Clone)]
pub struct TextEngine {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl TextEngine {
    /// System fonts plus any `.ttf`/`.otf`/`.ttc` files directly inside `font_dirs`.
    pub fn new(font_dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Engine for a stage rooted at `working_dir` (also scans its `fonts/` subdirectory).
    pub fn for_working_dir(working_dir: &Path) -> Self {
        Self::new(&[&working_dir.join("fonts")])
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Rasterize `label`, or `None` for blank text.
    ///
    /// The surface is the label's bounding box when one is set. Otherwise it is sized to the
    /// measured text: one line per paragraph, each line `1.2 × size` tall.
    #[tracing::instrument(skip(self, label, base_dir), fields(len = label.text.len()))]
    pub fn render(&self, label: &LabelSpec, base_dir: &Path) -> FoundryResult<Option<Surface>> {
        label.validate()?;
        if label.is_blank() {
            return Ok(None);
        }

        let (fontdb, family) = self.resolve_font(label.font.as_deref(), base_dir)?;
        let measure = |line: &str| -> f32 {
            let svg = text_svg(&[(0.0, line.to_string())], 1, 1, label, &family);
            parse_svg(&svg, &fontdb)
                .map(|tree| tree.root().abs_bounding_box().right().max(0.0))
                .unwrap_or(0.0)
        };

        let max_w = label.width.map(|w| w as f32);
        let lines = wrap_lines(&label.text, max_w, measure);
        let widths: Vec<f32> = lines.iter().map(|l| measure(l)).collect();

        let line_h = (label.size * LINE_HEIGHT).ceil();
        let width = label.width.unwrap_or_else(|| {
            (widths.iter().copied().fold(0.0f32, f32::max).ceil() as u32).max(1)
        });
        let height = label
            .height
            .unwrap_or_else(|| ((line_h * lines.len() as f32).ceil() as u32).max(1));

        let placed: Vec<(f32, String)> = lines
            .into_iter()
            .zip(widths)
            .map(|(line, w)| {
                let (x, _) = line_column(label.gravity).place(
                    (width, 1),
                    (w.ceil() as u32, 1),
                    Offset::ZERO,
                );
                (x.max(0) as f32, line)
            })
            .collect();

        let svg = text_svg(&placed, width, height, label, &family);
        let tree = parse_svg(&svg, &fontdb)?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| FoundryError::config("failed to allocate label pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Surface::from_premul(width, height, pixmap.data().to_vec()).map(Some)
    }

    fn resolve_font(
        &self,
        font: Option<&str>,
        base_dir: &Path,
    ) -> FoundryResult<(Arc<usvg::fontdb::Database>, String)> {
        let Some(font) = font.map(str::trim).filter(|f| !f.is_empty()) else {
            return Ok((self.fontdb.clone(), DEFAULT_FAMILY.to_string()));
        };

        let path = base_dir.join(font);
        if !is_font_file(&path) {
            return Ok((self.fontdb.clone(), font.to_string()));
        }

        let mut db = (*self.fontdb).clone();
        let ids = db.load_font_source(usvg::fontdb::Source::File(path.clone()));
        let family = ids
            .first()
            .and_then(|id| db.face(*id))
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| {
                FoundryError::config(format!("font file '{}' has no usable face", path.display()))
            })?;
        tracing::debug!(family = %family, path = %path.display(), "loaded label font");
        Ok((Arc::new(db), family))
    }
}

/// Break `text` into lines no wider than `max_width` using `measure`.
///
/// Explicit newlines always break. Words are never split, so a single word wider than
/// `max_width` gets a line of its own.
pub fn wrap_lines(
    text: &str,
    max_width: Option<f32>,
    mut measure: impl FnMut(&str) -> f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let Some(max_width) = max_width else {
            lines.push(paragraph.trim_end().to_string());
            continue;
        };

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Gravity with the same horizontal column as `g`, used to align lines inside the label.
fn line_column(g: Gravity) -> Gravity {
    match g {
        Gravity::NorthWest | Gravity::West | Gravity::SouthWest => Gravity::West,
        Gravity::North | Gravity::Center | Gravity::South => Gravity::Center,
        Gravity::NorthEast | Gravity::East | Gravity::SouthEast => Gravity::East,
    }
}

fn text_svg(
    lines: &[(f32, String)],
    width: u32,
    height: u32,
    label: &LabelSpec,
    family: &str,
) -> String {
    let line_h = (label.size * LINE_HEIGHT).ceil();
    let c = label.color;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    svg.push_str(&format!(
        r#"<text font-family="{}" font-size="{}" font-weight="{}" fill="rgb({},{},{})" fill-opacity="{}" xml:space="preserve">"#,
        escape_xml(family),
        label.size,
        label.weight,
        c.r,
        c.g,
        c.b,
        f32::from(c.a) / 255.0,
    ));
    for (i, (x, line)) in lines.iter().enumerate() {
        let baseline = (i as f32 + 1.0) * line_h - DESCENT * label.size;
        svg.push_str(&format!(
            r#"<tspan x="{x}" y="{baseline}">{}</tspan>"#,
            escape_xml(line)
        ));
    }
    svg.push_str("</text></svg>");
    svg
}

fn parse_svg(svg: &str, fontdb: &Arc<usvg::fontdb::Database>) -> FoundryResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: fontdb.clone(),
        ..Default::default()
    };
    usvg::Tree::from_str(svg, &opts)
        .map_err(|e| FoundryError::config(format!("label layout failed: {e}")))
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn is_font_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
            .unwrap_or(false)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !is_font_file(&path) {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/text/text.rs"]
mod tests;
