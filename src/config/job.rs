use crate::config::{ClusterConfig, ComposeConfig, PatternConfig, PrimaryMontageConfig};
use crate::foundation::error::{FoundryError, FoundryResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Every stage of one listing run in a single document.
///
/// Stages run in the order pattern → compose → preview → primary; absent sections are skipped.
pub struct JobConfig {
    #[serde(default)]
    pub pattern: Option<PatternConfig>,
    #[serde(default)]
    pub compose: Vec<ComposeConfig>,
    #[serde(default)]
    pub preview: Option<ClusterConfig>,
    #[serde(default)]
    pub primary: Option<PrimaryMontageConfig>,
    /// Worker threads for parallel stages; `None` uses one per core.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl JobConfig {
    pub fn validate(&self) -> FoundryResult<()> {
        if self.threads == Some(0) {
            return Err(FoundryError::config("threads must be > 0 when set"));
        }
        if let Some(pattern) = &self.pattern {
            pattern.validate()?;
        }
        for compose in &self.compose {
            compose.validate()?;
        }
        if let Some(preview) = &self.preview {
            preview.validate()?;
        }
        if let Some(primary) = &self.primary {
            primary.validate()?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.compose.is_empty()
            && self.preview.is_none()
            && self.primary.is_none()
    }
}
