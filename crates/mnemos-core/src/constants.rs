/// Mnemos system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds in one day, used for fractional age computation.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Default knowledge partition shared by every producing subsystem.
pub const DEFAULT_GROUP: &str = "shared_knowledge";

/// Source tag used when a caller does not name one.
pub const DEFAULT_SOURCE: &str = "claude_code";

/// Version tag written alongside every behavioral score.
pub const SCORING_VERSION: &str = "1.0.0";

/// Score returned when no behavioral signals are supplied.
pub const EMPTY_SIGNAL_SCORE: f64 = 0.0;

/// Maximum supersession chain length walked before giving up.
pub const MAX_SUPERSESSION_DEPTH: usize = 256;

/// Maximum content length accepted at capture (bytes).
pub const MAX_CONTENT_BYTES: usize = 1_048_576;
