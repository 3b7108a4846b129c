use serde::{Deserialize, Serialize};

use super::{ConfigError, StoreError};

/// Result alias used across the workspace.
pub type MnemosResult<T> = Result<T, MnemosError>;

/// Top-level error for every Mnemos operation.
#[derive(Debug, thiserror::Error)]
pub enum MnemosError {
    #[error("record not found: {id}")]
    NotFound { id: String },

    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("collaborator {collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        collaborator: String,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Discriminant of the error taxonomy, exposed to callers of the operation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    CollaboratorUnavailable,
    Configuration,
}

impl MnemosError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(collaborator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable {
            collaborator: collaborator.into(),
            reason: reason.into(),
        }
    }

    /// Map this error onto the caller-facing taxonomy.
    ///
    /// Store failures are collaborator failures. A serialization failure can only
    /// come from a malformed record or patch, so it is reported as validation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } | Self::Serialization(_) => ErrorKind::Validation,
            Self::CollaboratorUnavailable { .. } | Self::Store(_) => {
                ErrorKind::CollaboratorUnavailable
            }
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// True when the failure came from the store or another external collaborator.
    pub fn is_collaborator_failure(&self) -> bool {
        self.kind() == ErrorKind::CollaboratorUnavailable
    }
}
