use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;

use crate::config::load_json;
use crate::foundation::error::{FoundryError, FoundryResult};

/// File name of the listing metadata document inside a working directory.
pub const METADATA_FILE_NAME: &str = "listing.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Listing text produced upstream. Only `short_title` feeds the image stages.
pub struct ListingMetadata {
    pub title: String,
    pub short_title: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// Fields written by other tools (posts, meta, ...), kept so a save does not drop them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ListingMetadata {
    /// `true` once title, description and at least one keyword are present.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty() && !self.keywords.is_empty()
    }

    /// Short title when non-blank.
    pub fn short_title(&self) -> Option<&str> {
        Some(self.short_title.trim()).filter(|s| !s.is_empty())
    }

    /// Load `listing.json` from `working_dir`.
    pub fn load(working_dir: &Path) -> FoundryResult<Self> {
        load_json(&working_dir.join(METADATA_FILE_NAME))
    }

    /// Load `listing.json` when it exists.
    pub fn load_optional(working_dir: &Path) -> FoundryResult<Option<Self>> {
        let path = working_dir.join(METADATA_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        load_json(&path).map(Some)
    }

    /// Write `listing.json` into `working_dir` as pretty JSON.
    pub fn save(&self, working_dir: &Path) -> FoundryResult<()> {
        let path = working_dir.join(METADATA_FILE_NAME);
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| FoundryError::serde(format!("encode listing metadata: {e}")))?;
        let mut f = std::fs::File::create(&path)
            .with_context(|| format!("create '{}'", path.display()))?;
        f.write_all(&json)
            .and_then(|()| f.sync_all())
            .with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/listing/metadata.rs"]
mod tests;
