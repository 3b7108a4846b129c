use mnemos_core::MnemosResult;
use serde::{Deserialize, Serialize};

pub use mnemos_core::ErrorKind as FailureKind;

/// Discriminated result for callers that cannot carry a Rust `Result`
/// across their boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum OperationOutcome<T> {
    Ok(T),
    Failed(FailureKind, String),
}

impl<T> OperationOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(kind, _) => Some(*kind),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed(..) => None,
        }
    }
}

impl<T> From<MnemosResult<T>> for OperationOutcome<T> {
    fn from(result: MnemosResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::Failed(err.kind(), err.to_string()),
        }
    }
}
