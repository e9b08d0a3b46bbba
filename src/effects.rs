//! Raster effects applied to [`crate::surface::Surface`] values.

pub mod blur;
pub mod composite;
pub mod montage;
pub mod resample;
pub mod transform;
