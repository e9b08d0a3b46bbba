//! Listing imagery built from preview images: the clustered previews and the primary image.

pub mod metadata;
pub mod preview;
pub mod primary;

pub use metadata::{ListingMetadata, METADATA_FILE_NAME};
pub use preview::{PreviewReport, assemble_cluster, plan_clusters, run_preview};
pub use primary::{assemble_montage, run_primary, strip_percent};
