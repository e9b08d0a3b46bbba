//! Layer-based compositing of a single artwork.

pub mod engine;
pub mod layer;

pub use engine::{compose_surface, run_compose};
pub use layer::build_layer;
