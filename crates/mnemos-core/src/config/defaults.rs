// Single source of truth for all default values.

// --- Lifecycle ---
pub const DEFAULT_DECAY_FACTOR: f64 = 0.95;
pub const DEFAULT_HISTORICAL_AGE_DAYS: u32 = 30;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_CANDIDATE_LIMIT: usize = 30;
pub const DEFAULT_SCORE_FLOOR: f64 = 0.01;
pub const DEFAULT_ENABLE_CROSS_REFERENCES: bool = true;
pub const DEFAULT_LINK_SCAN_LIMIT: usize = 500;

// --- Scoring ---
pub const DEFAULT_COMMAND_SUCCESS_WEIGHT: f64 = 0.4;
pub const DEFAULT_TEST_RESULT_WEIGHT: f64 = 0.3;
pub const DEFAULT_TASK_COMPLETION_WEIGHT: f64 = 0.3;
pub const DEFAULT_BEHAVIORAL_BLEND: f64 = 0.6; // 60% behavioral, 40% decayed

// --- Cascade detection ---
pub const DEFAULT_CASCADE_WINDOW_SECONDS: u64 = 60;
pub const DEFAULT_CASCADE_MIN_EVENTS: usize = 3;
pub const DEFAULT_LATENCY_THRESHOLD_SECONDS: f64 = 5.0;
pub const DEFAULT_LONG_CALL_THRESHOLD_SECONDS: f64 = 30.0;
pub const DEFAULT_WAIT_THRESHOLD_SECONDS: f64 = 2.0;
pub const DEFAULT_FLAT_MEMORY_TOLERANCE_MB: f64 = 10.0;
pub const DEFAULT_BATCH_LIMIT: usize = 50;
pub const DEFAULT_CRITICAL_EXCEEDANCE: f64 = 2.0;
pub const DEFAULT_MEMORY_CRITICAL_PERCENT: f64 = 90.0;
pub const DEFAULT_MAX_BUFFERED_EVENTS: usize = 1_000;

// --- Sampling ---
pub const DEFAULT_MEMORY_PRESSURE_THRESHOLD: u8 = 70;
pub const DEFAULT_BASE_SAMPLE_RATE: f64 = 0.1;
pub const DEFAULT_MAX_ESCALATION_LEVEL: u8 = 5;
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 60;
pub const DEFAULT_LARGE_PAYLOAD_BYTES: usize = 10_000;
pub const DEFAULT_METRICS_WINDOW_SECONDS: u64 = 300; // 5 minutes

// --- Service ---
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_GROUP_ID: &str = crate::constants::DEFAULT_GROUP;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
pub const DEFAULT_SELF_MONITORING: bool = true;
