use serde::{Deserialize, Serialize};

/// Lifecycle status of a record.
///
/// Transitions: ACTIVE → SUPERSEDED, ACTIVE → HISTORICAL, HISTORICAL → SUPERSEDED,
/// any → DEPRECATED. Nothing ever returns to ACTIVE and DEPRECATED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Current best knowledge, full weight.
    #[default]
    Active,
    /// Replaced by a newer record, retained for history.
    Superseded,
    /// Aged past the threshold without replacement.
    Historical,
    /// Manually invalidated, excluded from normal search.
    Deprecated,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 4] = [
        RecordStatus::Active,
        RecordStatus::Superseded,
        RecordStatus::Historical,
        RecordStatus::Deprecated,
    ];

    /// Ranking multiplier for this status.
    pub fn weight(self) -> f64 {
        match self {
            Self::Active => 1.0,
            Self::Superseded => 0.3,
            Self::Historical => 0.1,
            Self::Deprecated => 0.0,
        }
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// Re-asserting the current status is allowed for every non-active status
    /// so that retried writes are idempotent.
    pub fn can_transition_to(self, next: RecordStatus) -> bool {
        use RecordStatus::*;
        match (self, next) {
            (Deprecated, Deprecated) => true,
            (Deprecated, _) => false,
            (_, Deprecated) => true,
            (_, Active) => false,
            (Active, Superseded) | (Active, Historical) => true,
            (Historical, Superseded) => true,
            (Superseded, Superseded) | (Historical, Historical) => true,
            (Superseded, Historical) => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Deprecated
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Superseded => "superseded",
            Self::Historical => "historical",
            Self::Deprecated => "deprecated",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = crate::errors::MnemosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "superseded" => Ok(Self::Superseded),
            "historical" => Ok(Self::Historical),
            "deprecated" => Ok(Self::Deprecated),
            other => Err(crate::errors::MnemosError::validation(
                "status",
                format!("unknown status {other:?}"),
            )),
        }
    }
}
