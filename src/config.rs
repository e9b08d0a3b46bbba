//! Declarative stage configuration.
//!
//! Every document is plain JSON. Omitted fields take the documented defaults, and each type
//! offers `validate()` to reject impossible values before any pixels are touched.

mod compose;
mod job;
mod label;
pub(crate) mod listing;
mod pattern;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{FoundryError, FoundryResult};

pub use compose::{ComposeConfig, LayerSpec};
pub use job::JobConfig;
pub use label::LabelSpec;
pub use listing::{CLUSTER_NUMBER_TOKEN, ClusterConfig, Placement, PrimaryMontageConfig};
pub use pattern::PatternConfig;

/// Read a JSON document from `path`.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> FoundryResult<T> {
    if !path.is_file() {
        return Err(FoundryError::config(format!(
            "config file '{}' does not exist",
            path.display()
        )));
    }
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| FoundryError::serde(format!("parse '{}': {e}", path.display())))
}

/// Parse a JSON document held in memory.
pub fn from_json_str<T: serde::de::DeserializeOwned>(json: &str) -> FoundryResult<T> {
    serde_json::from_str(json).map_err(|e| FoundryError::serde(e.to_string()))
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
