/// Convenience result type used across the foundry.
pub type FoundryResult<T> = Result<T, FoundryError>;

/// Top-level error taxonomy used by every stage.
///
/// No stage retries. Each variant is fatal to the task that produced it.
#[derive(thiserror::Error, Debug)]
pub enum FoundryError {
    /// Invalid configuration: missing working directory, missing source file,
    /// malformed distort points, impossible grid dimensions.
    #[error("configuration error: {0}")]
    Config(String),

    /// A source image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// An output file could not be encoded or written.
    #[error("write error: {0}")]
    Write(String),

    /// Errors when serializing or deserializing configuration documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FoundryError {
    /// Build a [`FoundryError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FoundryError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FoundryError::Write`] value.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Build a [`FoundryError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
