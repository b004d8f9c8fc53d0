use cadence_session::SessionError;
use cadence_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Persistence error: {0}")]
    Persistence(#[from] std::io::Error),
}

impl EngineError {
    /// The operation named an item or session that does not exist.
    pub const fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::InvalidReference(_))
                | Self::Session(SessionError::InvalidReference(_))
        )
    }

    /// The operation is not allowed in the current session state.
    pub const fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            Self::Session(SessionError::InvalidTransition { .. } | SessionError::EmptyPool)
        )
    }

    /// A persisted snapshot was rejected.
    pub const fn is_deserialization(&self) -> bool {
        match self {
            Self::Store(err) => err.is_deserialization(),
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
