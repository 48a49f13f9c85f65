use crate::types::{EntryId, Resource};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Insufficient funds for '{entry}': need {required} {resource}, have {available}")]
    InsufficientFunds {
        entry:     EntryId,
        resource:  Resource,
        required:  f64,
        available: f64,
    },

    #[error("'{entry}' is locked: prerequisites not met")]
    Locked { entry: EntryId },

    #[error("'{entry}' is a one-time upgrade and is already owned")]
    AlreadyOwned { entry: EntryId },

    #[error("Unknown catalog entry '{entry}'")]
    UnknownEntry { entry: EntryId },

    #[error("Invalid amount {amount} for {action}")]
    InvalidAmount { action: &'static str, amount: f64 },

    #[error("Malformed snapshot: {reason}")]
    MalformedData { reason: String },

    /// Internal invariant breach. Hosts treat this as fatal.
    #[error("Resource bound violated: {resource} would become {attempted}")]
    ResourceBoundViolation { resource: Resource, attempted: f64 },

    #[error("Invalid game content: {reason}")]
    InvalidContent { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedData { reason: reason.into() }
    }

    pub(crate) fn invalid_content(reason: impl Into<String>) -> Self {
        Self::InvalidContent { reason: reason.into() }
    }

    /// True for rejections the player can recover from without any state change.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. }
                | Self::Locked { .. }
                | Self::AlreadyOwned { .. }
                | Self::UnknownEntry { .. }
                | Self::InvalidAmount { .. }
                | Self::MalformedData { .. }
        )
    }
}

pub type SimResult<T> = Result<T, SimError>;
