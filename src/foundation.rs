//! Shared primitives: colors, placement, error taxonomy, fixed-point math.

pub mod core;
pub mod error;
pub(crate) mod math;
