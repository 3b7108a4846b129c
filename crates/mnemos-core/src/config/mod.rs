//! Layered configuration: compiled defaults, optional TOML file, then
//! `MNEMOS_*` environment overrides, then validation.

pub mod cascade_config;
pub mod defaults;
pub mod lifecycle_config;
pub mod observability_config;
pub mod sampling_config;
pub mod scoring_config;
pub mod service_config;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use cascade_config::CascadeConfig;
pub use lifecycle_config::LifecycleConfig;
pub use observability_config::ObservabilityConfig;
pub use sampling_config::SamplingConfig;
pub use scoring_config::ScoringConfig;
pub use service_config::ServiceConfig;

use crate::errors::ConfigError;

/// Environment keys recognized by [`MnemosConfig::apply_overrides`].
pub mod keys {
    pub const DECAY_FACTOR: &str = "MNEMOS_DECAY_FACTOR";
    pub const HISTORICAL_AGE_DAYS: &str = "MNEMOS_HISTORICAL_AGE_DAYS";
    pub const CASCADE_WINDOW_SECONDS: &str = "MNEMOS_CASCADE_WINDOW_SECONDS";
    pub const CASCADE_MIN_EVENTS: &str = "MNEMOS_CASCADE_MIN_EVENTS";
    pub const LATENCY_THRESHOLD_SECONDS: &str = "MNEMOS_LATENCY_THRESHOLD_SECONDS";
    pub const MEMORY_PRESSURE_THRESHOLD: &str = "MNEMOS_MEMORY_PRESSURE_THRESHOLD";
    pub const BASE_SAMPLE_RATE: &str = "MNEMOS_BASE_SAMPLE_RATE";
    pub const SAMPLING_COOLDOWN_SECONDS: &str = "MNEMOS_SAMPLING_COOLDOWN_SECONDS";
    pub const SAMPLING_SEED: &str = "MNEMOS_SAMPLING_SEED";
    pub const STORE_TIMEOUT_MS: &str = "MNEMOS_STORE_TIMEOUT_MS";
    pub const GROUP_ID: &str = "MNEMOS_GROUP_ID";
    pub const LOG_LEVEL: &str = "MNEMOS_LOG_LEVEL";
}

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MnemosConfig {
    pub lifecycle: LifecycleConfig,
    pub scoring: ScoringConfig,
    pub cascade: CascadeConfig,
    pub sampling: SamplingConfig,
    pub service: ServiceConfig,
    pub observability: ObservabilityConfig,
}

impl MnemosConfig {
    /// Resolve the full configuration from an optional TOML file and the
    /// process environment, then validate it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file without overrides or validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply key/value overrides. `lookup` returns the raw value for a key, if set.
    ///
    /// A key that is present but cannot be parsed is an error rather than a
    /// silently ignored override.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override::<f64, _>(&lookup, keys::DECAY_FACTOR)? {
            self.lifecycle.decay_factor = v;
        }
        if let Some(v) = parse_override::<u32, _>(&lookup, keys::HISTORICAL_AGE_DAYS)? {
            self.lifecycle.historical_age_days = v;
        }
        if let Some(v) = parse_override::<u64, _>(&lookup, keys::CASCADE_WINDOW_SECONDS)? {
            self.cascade.window_seconds = v;
        }
        if let Some(v) = parse_override::<usize, _>(&lookup, keys::CASCADE_MIN_EVENTS)? {
            self.cascade.min_events = v;
        }
        if let Some(v) = parse_override::<f64, _>(&lookup, keys::LATENCY_THRESHOLD_SECONDS)? {
            self.cascade.latency_threshold_seconds = v;
            self.sampling.latency_threshold_seconds = v;
        }
        if let Some(v) = parse_override::<u8, _>(&lookup, keys::MEMORY_PRESSURE_THRESHOLD)? {
            self.sampling.memory_pressure_threshold = v;
            self.cascade.memory_pressure_threshold = v as f64;
        }
        if let Some(v) = parse_override::<f64, _>(&lookup, keys::BASE_SAMPLE_RATE)? {
            self.sampling.base_rate = v;
        }
        if let Some(v) = parse_override::<u64, _>(&lookup, keys::SAMPLING_COOLDOWN_SECONDS)? {
            self.sampling.cooldown_seconds = v;
        }
        if let Some(v) = parse_override::<u64, _>(&lookup, keys::SAMPLING_SEED)? {
            self.sampling.seed = Some(v);
        }
        if let Some(v) = parse_override::<u64, _>(&lookup, keys::STORE_TIMEOUT_MS)? {
            self.service.store_timeout_ms = v;
        }
        if let Some(v) = lookup(keys::GROUP_ID) {
            self.service.group_id = v;
        }
        if let Some(v) = lookup(keys::LOG_LEVEL) {
            self.observability.log_level = v;
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let decay = self.lifecycle.decay_factor;
        if !(decay > 0.0 && decay < 1.0) {
            return Err(invalid("lifecycle.decay_factor", "must be in the open range (0, 1)"));
        }
        if self.lifecycle.historical_age_days == 0 {
            return Err(invalid("lifecycle.historical_age_days", "must be greater than 0"));
        }
        if self.lifecycle.search_limit == 0 {
            return Err(invalid("lifecycle.search_limit", "must be greater than 0"));
        }
        if self.lifecycle.link_scan_limit == 0 {
            return Err(invalid("lifecycle.link_scan_limit", "must be greater than 0"));
        }
        if self.lifecycle.candidate_limit < self.lifecycle.search_limit {
            return Err(invalid(
                "lifecycle.candidate_limit",
                "must be at least lifecycle.search_limit",
            ));
        }
        if !(0.0..=1.0).contains(&self.scoring.behavioral_blend) {
            return Err(invalid("scoring.behavioral_blend", "must be between 0.0 and 1.0"));
        }
        for (field, weight) in [
            ("scoring.command_success_weight", self.scoring.command_success_weight),
            ("scoring.test_result_weight", self.scoring.test_result_weight),
            ("scoring.task_completion_weight", self.scoring.task_completion_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }
        if self.cascade.window_seconds == 0 {
            return Err(invalid("cascade.window_seconds", "must be greater than 0"));
        }
        if self.cascade.min_events == 0 {
            return Err(invalid("cascade.min_events", "must be at least 1"));
        }
        if self.cascade.latency_threshold_seconds <= 0.0 {
            return Err(invalid("cascade.latency_threshold_seconds", "must be positive"));
        }
        if self.cascade.long_call_threshold_seconds <= self.cascade.latency_threshold_seconds {
            return Err(invalid(
                "cascade.long_call_threshold_seconds",
                "must exceed cascade.latency_threshold_seconds",
            ));
        }
        if self.cascade.critical_exceedance <= 1.0 {
            return Err(invalid("cascade.critical_exceedance", "must be greater than 1.0"));
        }
        if self.cascade.max_buffered_events < self.cascade.min_events {
            return Err(invalid(
                "cascade.max_buffered_events",
                "must be at least cascade.min_events",
            ));
        }
        if !(1..=100).contains(&self.sampling.memory_pressure_threshold) {
            return Err(invalid("sampling.memory_pressure_threshold", "must be between 1 and 100"));
        }
        if !(0.0..=1.0).contains(&self.sampling.base_rate) {
            return Err(invalid("sampling.base_rate", "must be between 0.0 and 1.0"));
        }
        if self.sampling.max_level == 0 {
            return Err(invalid("sampling.max_level", "must be at least 1"));
        }
        if self.sampling.latency_threshold_seconds <= 0.0 {
            return Err(invalid("sampling.latency_threshold_seconds", "must be positive"));
        }
        if self.service.store_timeout_ms == 0 {
            return Err(invalid("service.store_timeout_ms", "must be greater than 0"));
        }
        if self.service.group_id.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: keys::GROUP_ID.to_string(),
            });
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidOverride {
                key: key.to_string(),
                value: raw,
            }),
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
