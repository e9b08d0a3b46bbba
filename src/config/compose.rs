use std::path::PathBuf;

use crate::config::LabelSpec;
use crate::effects::transform::TransformPipeline;
use crate::foundation::core::{BlendOp, Offset, Rgba8};
use crate::foundation::error::{FoundryError, FoundryResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One layer of a composed artwork.
///
/// Relative paths resolve against the stage's working directory.
pub struct LayerSpec {
    /// Source image placed at `offset` on the layer canvas.
    #[serde(default)]
    pub image: Option<PathBuf>,
    /// Grayscale mask whose coverage replaces the finished layer's alpha.
    #[serde(default)]
    pub mask: Option<PathBuf>,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: Option<f64>,
    /// Scale as a percentage of the current size.
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub offset: Offset,
    /// Perspective control points `[sx, sy, dx, dy, ...]`.
    #[serde(default)]
    pub distort: Option<Vec<f64>>,
    #[serde(default)]
    pub label: Option<LabelSpec>,
    /// Operator used to composite the finished layer onto the canvas.
    #[serde(default)]
    pub op: BlendOp,
}

impl Default for LayerSpec {
    fn default() -> Self {
        Self {
            image: None,
            mask: None,
            rotation: None,
            scale: None,
            offset: Offset::ZERO,
            distort: None,
            label: None,
            op: BlendOp::Over,
        }
    }
}

impl LayerSpec {
    /// `true` when the layer has neither an image nor a label.
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.label.is_none()
    }

    pub fn transforms(&self) -> TransformPipeline {
        TransformPipeline {
            rotation: self.rotation,
            scale: self.scale,
            distort: self.distort.clone(),
        }
    }

    pub fn validate(&self) -> FoundryResult<()> {
        self.transforms().validate()?;
        if let Some(label) = &self.label {
            label.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A canvas plus the ordered layers painted onto it.
pub struct ComposeConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
    /// Output file, relative to the working directory. The extension picks the format.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Opaque fill of the base canvas.
    #[serde(default = "default_background")]
    pub background: Rgba8,
    /// Layers in painting order; later layers paint over earlier ones.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            output: default_output(),
            background: default_background(),
            layers: Vec::new(),
        }
    }
}

impl ComposeConfig {
    pub fn validate(&self) -> FoundryResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FoundryError::config("compose canvas width/height must be > 0"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(FoundryError::config("compose output path must be non-empty"));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate().map_err(|e| match e {
                FoundryError::Config(msg) => FoundryError::config(format!("layer {i}: {msg}")),
                other => other,
            })?;
        }
        Ok(())
    }
}

fn default_canvas_width() -> u32 {
    2048
}

fn default_canvas_height() -> u32 {
    2048
}

fn default_output() -> PathBuf {
    PathBuf::from("compose.png")
}

fn default_background() -> Rgba8 {
    Rgba8::WHITE
}
