use mnemos_core::config::LifecycleConfig;
use mnemos_core::constants::DEFAULT_SOURCE;
use mnemos_core::BehavioralSignal;
use mnemos_lifecycle::SearchOptions;
use serde::{Deserialize, Serialize};

/// A search as callers phrase it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub include_historical: bool,
    #[serde(default)]
    pub include_deprecated: bool,
    #[serde(default)]
    pub filter_source: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            include_historical: false,
            include_deprecated: false,
            filter_source: None,
            limit: None,
        }
    }

    pub fn include_historical(mut self, include: bool) -> Self {
        self.include_historical = include;
        self
    }

    pub fn include_deprecated(mut self, include: bool) -> Self {
        self.include_deprecated = include;
        self
    }

    pub fn filter_source(mut self, source: impl Into<String>) -> Self {
        self.filter_source = Some(source.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn options(&self, config: &LifecycleConfig) -> SearchOptions {
        let mut options = SearchOptions::from_config(config)
            .with_historical(self.include_historical)
            .with_deprecated(self.include_deprecated);
        if let Some(source) = &self.filter_source {
            options = options.with_source(source.clone());
        }
        if let Some(limit) = self.limit {
            options = options.with_limit(limit);
        }
        options
    }
}

/// Content to capture, with optional outcome signals scored before append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub content: String,
    pub source: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub signals: Vec<BehavioralSignal>,
}

impl CaptureRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: DEFAULT_SOURCE.to_string(),
            title: None,
            signals: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_signals(mut self, signals: Vec<BehavioralSignal>) -> Self {
        self.signals = signals;
        self
    }
}

/// Result of a read path. `degraded` is set when the store failed and `data`
/// is the empty fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadResponse<T> {
    pub data: T,
    pub degraded: bool,
}

impl<T> ReadResponse<T> {
    pub fn fresh(data: T) -> Self {
        Self { data, degraded: false }
    }
}

impl<T: Default> ReadResponse<T> {
    pub fn fallback() -> Self {
        Self {
            data: T::default(),
            degraded: true,
        }
    }
}
