//! Listing Foundry assembles product-listing imagery from source artwork.
//!
//! Four stages share one raster core:
//!
//! 1. **Pattern**: repeat each source tile on a 3×3 grid and write full-size and preview JPEGs.
//! 2. **Compose**: paint ordered layers (image, caption, transforms, alpha mask) onto a canvas.
//! 3. **Preview**: group preview images into clusters and lay each cluster out with shadows
//!    and per-position rotation.
//! 4. **Primary**: slice previews into strips, tile them and stamp the listing's short title.
//!
//! Every stage takes its configuration and a [`StageContext`] explicitly. Pixels are
//! premultiplied RGBA8 end to end, and [`Surface::write`] returns only after the encoded bytes
//! are synced to disk.
#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod effects;
pub mod foundation;
pub mod job;
pub mod listing;
pub mod pattern;
pub mod surface;
pub mod text;
pub mod workspace;

pub use compose::{build_layer, compose_surface, run_compose};
pub use config::{
    ClusterConfig, ComposeConfig, JobConfig, LabelSpec, LayerSpec, PatternConfig, Placement,
    PrimaryMontageConfig, load_json,
};
pub use effects::blur::ShadowSpec;
pub use effects::transform::TransformPipeline;
pub use foundation::core::{BlendOp, Gravity, Offset, Position, Rgba8};
pub use foundation::error::{FoundryError, FoundryResult};
pub use job::{JobReport, run_job};
pub use listing::{ListingMetadata, PreviewReport, run_preview, run_primary};
pub use pattern::{PatternOutput, PatternReport, run_pattern};
pub use surface::{ColorProfile, Surface};
pub use text::TextEngine;
pub use workspace::StageContext;
