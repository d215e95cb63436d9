use thiserror::Error;

/// Every failure the decode core can report.
#[derive(Debug, Error)]
pub enum QuarryError {
    /// The record is missing a required field or holds one of the wrong shape.
    #[error("Format error: {0}")]
    Format(String),

    /// No registered decoder claims the record's format/version key.
    #[error("Unsupported version: no decoder for {format} version {version}")]
    UnsupportedVersion { format: String, version: i32 },

    /// A single entity record could not be turned into an entry.
    #[error("Entity decode error at index {index}: {reason}")]
    EntityDecode { index: usize, reason: String },

    #[error("No {family} interface defined for version {version}")]
    UnknownInterface { family: String, version: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid interface definitions: {0}")]
    Definitions(#[from] serde_json::Error),
}

impl QuarryError {
    pub fn format(msg: impl Into<String>) -> Self {
        QuarryError::Format(msg.into())
    }

    pub fn entity(index: usize, reason: impl Into<String>) -> Self {
        QuarryError::EntityDecode {
            index,
            reason: reason.into(),
        }
    }
}
