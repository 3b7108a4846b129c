use serde::{Deserialize, Serialize};

use super::defaults;

/// Operation surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Timeout applied to every record store call, in milliseconds.
    pub store_timeout_ms: u64,
    /// Knowledge partition every capture and search targets.
    pub group_id: String,
    /// Feed each operation's own duration into the cascade detector.
    pub self_monitoring: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: defaults::DEFAULT_STORE_TIMEOUT_MS,
            group_id: defaults::DEFAULT_GROUP_ID.to_string(),
            self_monitoring: defaults::DEFAULT_SELF_MONITORING,
        }
    }
}
