//! Shared record builders and JSON scenario fixtures for Mnemos tests.
//!
//! Loader functions panic on missing or malformed fixtures; they are for
//! tests only.

use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mnemos_core::{MetadataPatch, Record, RecordStatus};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Fixed reference clock used by fixtures and builders.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("reference timestamp is ambiguous"))
}

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and deserialize a JSON fixture, relative to the fixtures directory.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

// ── Record builder ─────────────────────────────────────────────────────────

/// Builder for records with controlled age and lifecycle state.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
    now: DateTime<Utc>,
}

impl RecordBuilder {
    /// A fresh ACTIVE record created at [`reference_now`].
    pub fn new(content: &str) -> Self {
        let now = reference_now();
        Self {
            record: Record::with_default_source(content, now),
            now,
        }
    }

    /// Measure ages from `now` instead of [`reference_now`].
    pub fn relative_to(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self.record.created_at = now;
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.record.id = id.to_string();
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.record.source = source.to_string();
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.record.group = group.to_string();
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record.title = Some(title.to_string());
        self
    }

    /// Created `days` (fractional) before the builder's clock.
    pub fn aged_days(mut self, days: f64) -> Self {
        let millis = (days * 86_400_000.0).round() as i64;
        self.record.created_at = self.now - Duration::milliseconds(millis);
        self
    }

    pub fn cross_references(mut self, tags: &[&str]) -> Self {
        self.record.metadata.cross_references = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set a status directly, bypassing the state machine.
    pub fn status(mut self, status: RecordStatus) -> Self {
        self.record.metadata.status = status;
        self.record.metadata.status_changed_at = Some(self.now);
        self
    }

    /// Mark as superseded by `successor_id`.
    ///
    /// # Panics
    /// Panics if the current status does not allow supersession.
    pub fn superseded_by(mut self, successor_id: &str) -> Self {
        let patch = MetadataPatch::SupersededBy {
            successor_id: successor_id.to_string(),
            reason: "fixture".to_string(),
            at: self.now,
        };
        self.record
            .metadata
            .apply(&patch)
            .unwrap_or_else(|e| panic!("fixture supersession failed: {e}"));
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

// ── Scenario fixtures ──────────────────────────────────────────────────────

/// A search candidate described relative to the reference clock.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordSpec {
    pub id: String,
    pub content: String,
    #[serde(default = "default_source")]
    pub source: String,
    pub age_days: f64,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub superseded_by: Option<String>,
    #[serde(default)]
    pub cross_references: Vec<String>,
}

fn default_source() -> String {
    mnemos_core::constants::DEFAULT_SOURCE.to_string()
}

impl RecordSpec {
    pub fn to_record(&self) -> Record {
        let mut record = RecordBuilder::new(&self.content)
            .id(&self.id)
            .source(&self.source)
            .aged_days(self.age_days)
            .build();
        record.metadata.status = self.status;
        record.metadata.superseded_by = self.superseded_by.clone();
        record.metadata.cross_references = self.cross_references.clone();
        record
    }
}

/// Candidates plus the expected ranking and reclassifications.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingScenario {
    pub description: String,
    pub include_historical: bool,
    pub records: Vec<RecordSpec>,
    pub expected_order: Vec<String>,
    pub expected_reclassified: Vec<String>,
}

/// One operation event, offset from the reference clock.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSpec {
    pub operation: String,
    pub duration_seconds: f64,
    #[serde(default)]
    pub memory_delta_mb: f64,
    #[serde(default)]
    pub memory_percent: f64,
    pub offset_seconds: i64,
    #[serde(default)]
    pub remote_call: bool,
}

impl EventSpec {
    pub fn timestamp(&self) -> DateTime<Utc> {
        reference_now() + Duration::seconds(self.offset_seconds)
    }
}

/// An event sequence and the verdict expected after the last event.
#[derive(Debug, Clone, Deserialize)]
pub struct CascadeScenario {
    pub description: String,
    pub events: Vec<EventSpec>,
    /// Index of the first event expected to produce a verdict.
    pub first_verdict_at: usize,
    pub expected_kind: String,
    pub expected_critical: bool,
}

/// Outcomes of one observed session, with an independent effectiveness rating.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredSession {
    pub command_success: bool,
    pub test_result: bool,
    pub task_completion: bool,
    pub ground_truth: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationScenario {
    pub description: String,
    pub sessions: Vec<ScoredSession>,
    pub minimum_coefficient: f64,
}
