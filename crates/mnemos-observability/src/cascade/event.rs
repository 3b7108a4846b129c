use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of work an operation performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    #[default]
    Local,
    /// Call to a remote collaborator such as the extraction model.
    RemoteCall,
    /// Work that waited on a queue or permit before running.
    Queued,
}

/// One completed operation observed by the detector. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeEvent {
    pub operation: String,
    pub duration_seconds: f64,
    /// Memory growth during the operation, in MB.
    pub memory_delta_mb: f64,
    /// Process memory usage after the operation, 0–100.
    pub memory_percent: f64,
    pub timestamp: DateTime<Utc>,
    pub error: Option<String>,
    pub kind: OperationKind,
    pub trace_id: Option<String>,
}

impl CascadeEvent {
    pub fn new(
        operation: impl Into<String>,
        duration_seconds: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operation: operation.into(),
            duration_seconds,
            memory_delta_mb: 0.0,
            memory_percent: 0.0,
            timestamp,
            error: None,
            kind: OperationKind::Local,
            trace_id: None,
        }
    }

    pub fn with_memory(mut self, delta_mb: f64, percent: f64) -> Self {
        self.memory_delta_mb = delta_mb;
        self.memory_percent = percent;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_kind(mut self, kind: OperationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Tiered severity of this single event.
    pub fn severity(&self) -> f64 {
        let mut score = 0.0;

        score += match self.duration_seconds {
            d if d > 10.0 => 3.0,
            d if d > 5.0 => 2.0,
            d if d > 2.0 => 1.0,
            _ => 0.0,
        };
        score += match self.memory_delta_mb {
            m if m > 500.0 => 3.0,
            m if m > 200.0 => 2.0,
            m if m > 100.0 => 1.0,
            _ => 0.0,
        };
        score += match self.memory_percent {
            p if p > 80.0 => 2.0,
            p if p > 70.0 => 1.0,
            _ => 0.0,
        };
        if self.error.is_some() {
            score += 2.0;
        }
        score
    }
}
