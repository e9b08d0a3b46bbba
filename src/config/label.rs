use crate::foundation::core::{Gravity, Offset, Rgba8};
use crate::foundation::error::{FoundryError, FoundryResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Caption text rasterized onto a layer or listing image.
pub struct LabelSpec {
    /// Caption text. Empty text renders nothing.
    #[serde(default)]
    pub text: String,
    /// Font family name, or a path to a font file relative to the working directory.
    /// Falls back to the system sans-serif family.
    #[serde(default)]
    pub font: Option<String>,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub size: f32,
    /// CSS-style font weight (100..=900).
    #[serde(default = "default_font_weight")]
    pub weight: u16,
    /// Fill color.
    #[serde(default = "default_label_color")]
    pub color: Rgba8,
    /// Anchor used when the label is placed onto its parent surface.
    #[serde(default)]
    pub gravity: Gravity,
    /// Bounding width; text is word-wrapped to it when set.
    #[serde(default)]
    pub width: Option<u32>,
    /// Bounding height; taller text is clipped.
    #[serde(default)]
    pub height: Option<u32>,
    /// Offset relative to the gravity anchor.
    #[serde(default)]
    pub offset: Offset,
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: None,
            size: default_font_size(),
            weight: default_font_weight(),
            color: default_label_color(),
            gravity: Gravity::default(),
            width: None,
            height: None,
            offset: Offset::ZERO,
        }
    }
}

impl LabelSpec {
    /// `true` when rendering this label would produce nothing.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn validate(&self) -> FoundryResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(FoundryError::config("label size must be finite and > 0"));
        }
        if !(100..=900).contains(&self.weight) {
            return Err(FoundryError::config(format!(
                "label weight must be within 100..=900 (got {})",
                self.weight
            )));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(FoundryError::config("label bounding box must be > 0 when set"));
        }
        Ok(())
    }
}

fn default_font_size() -> f32 {
    48.0
}

fn default_font_weight() -> u16 {
    400
}

fn default_label_color() -> Rgba8 {
    Rgba8::BLACK
}
