use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metadata::RecordMetadata;
use super::status::RecordStatus;
use crate::constants::{DEFAULT_GROUP, DEFAULT_SOURCE};

/// An immutable unit of captured knowledge.
///
/// Content, source and creation time never change after append. Only
/// `metadata` is written afterwards, one [`super::MetadataPatch`] at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// UUID v4 identifier.
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Producing subsystem.
    pub source: String,
    /// Knowledge partition.
    pub group: String,
    pub created_at: DateTime<Utc>,
    /// blake3 hash of content.
    pub content_hash: String,
    #[serde(default)]
    pub metadata: RecordMetadata,
}

impl Record {
    /// Build a fresh ACTIVE record with a new id.
    pub fn new(
        content: impl Into<String>,
        source: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        let content_hash = Self::compute_content_hash(&content);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content,
            title: None,
            source: source.into(),
            group: DEFAULT_GROUP.to_string(),
            created_at,
            content_hash,
            metadata: RecordMetadata::default(),
        }
    }

    /// Record with the default source tag.
    pub fn with_default_source(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(content, DEFAULT_SOURCE, created_at)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn compute_content_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Fingerprint of a supersession request: successor content plus reason.
    pub fn supersession_fingerprint(content: &str, reason: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(content.as_bytes());
        hasher.update("\u{1f}".as_bytes());
        hasher.update(reason.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn status(&self) -> RecordStatus {
        self.metadata.status
    }

    /// Whether another record has already been recorded as this one's successor.
    pub fn is_superseded(&self) -> bool {
        self.metadata.superseded_by.is_some()
    }
}

/// Identity comparison, as for any entity.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}
