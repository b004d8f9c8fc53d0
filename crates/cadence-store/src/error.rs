use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Review item not found: {0}")]
    InvalidReference(Uuid),
    #[error("Review item already exists: {0}")]
    DuplicateItem(Uuid),
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("Snapshot is not valid JSON: {0}")]
    Deserialization(#[source] serde_json::Error),
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

impl StoreError {
    /// Whether the error means a persisted snapshot had to be rejected.
    pub const fn is_deserialization(&self) -> bool {
        matches!(
            self,
            Self::Deserialization(_) | Self::UnsupportedVersion { .. } | Self::CorruptSnapshot(_)
        )
    }
}
