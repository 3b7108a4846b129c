use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::RecordStatus;
use crate::errors::{MnemosError, MnemosResult};
use crate::signal::BehavioralScore;

/// Supersession edge stored on the newer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supersession {
    /// Ids of the records this one replaces. Always older than this record.
    pub supersedes: Vec<String>,
    pub supersession_reason: String,
    pub superseded_at: DateTime<Utc>,
    /// blake3 of new content and reason, used to detect retried supersessions.
    pub fingerprint: String,
}

/// Typed metadata of a record.
///
/// Known observation kinds are typed fields. Anything else the external store
/// carries is kept opaquely in `extra` so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecordMetadata {
    pub status: RecordStatus,
    pub status_changed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supersession: Option<Supersession>,
    /// Successor pointer, written onto the old record when it is superseded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavioral: Option<BehavioralScore>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cross_references: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single metadata write accepted by the record store.
///
/// Records are never rewritten wholesale. Every mutation after append is one
/// of these patches, applied through [`RecordMetadata::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetadataPatch {
    Status {
        status: RecordStatus,
        at: DateTime<Utc>,
        reason: Option<String>,
    },
    SupersededBy {
        successor_id: String,
        reason: String,
        at: DateTime<Utc>,
    },
    Behavioral(BehavioralScore),
    CrossReferences { tags: Vec<String> },
    Opaque { key: String, value: serde_json::Value },
}

/// Keys reserved for typed fields; opaque patches may not shadow them.
const RESERVED_KEYS: [&str; 7] = [
    "status",
    "status_changed_at",
    "supersession",
    "superseded_by",
    "status_reason",
    "behavioral",
    "cross_references",
];

impl RecordMetadata {
    /// Apply a patch, enforcing the status state machine.
    pub fn apply(&mut self, patch: &MetadataPatch) -> MnemosResult<()> {
        match patch {
            MetadataPatch::Status { status, at, reason } => {
                self.transition(*status, *at)?;
                if reason.is_some() {
                    self.status_reason = reason.clone();
                }
            }
            MetadataPatch::SupersededBy {
                successor_id,
                reason,
                at,
            } => {
                if let Some(existing) = &self.superseded_by {
                    if existing != successor_id {
                        return Err(MnemosError::validation(
                            "superseded_by",
                            format!("already superseded by {existing}"),
                        ));
                    }
                }
                self.transition(RecordStatus::Superseded, *at)?;
                self.superseded_by = Some(successor_id.clone());
                self.status_reason = Some(reason.clone());
            }
            MetadataPatch::Behavioral(score) => {
                self.behavioral = Some(score.clone());
            }
            MetadataPatch::CrossReferences { tags } => {
                for tag in tags {
                    if !self.cross_references.iter().any(|t| t == tag) {
                        self.cross_references.push(tag.clone());
                    }
                }
            }
            MetadataPatch::Opaque { key, value } => {
                if RESERVED_KEYS.contains(&key.as_str()) {
                    return Err(MnemosError::validation(
                        "metadata",
                        format!("opaque key {key:?} is reserved"),
                    ));
                }
                self.extra.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    fn transition(&mut self, next: RecordStatus, at: DateTime<Utc>) -> MnemosResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(MnemosError::validation(
                "status",
                format!("illegal transition {} -> {}", self.status, next),
            ));
        }
        if self.status != next {
            self.status = next;
            self.status_changed_at = Some(at);
        }
        Ok(())
    }

    /// Ids this record replaces, empty when it replaces nothing.
    pub fn supersedes(&self) -> &[String] {
        self.supersession
            .as_ref()
            .map(|s| s.supersedes.as_slice())
            .unwrap_or(&[])
    }
}
