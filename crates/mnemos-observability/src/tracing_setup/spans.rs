//! Span definitions per operation.

/// Create a search span.
#[macro_export]
macro_rules! search_span {
    ($query:expr, $include_historical:expr) => {
        tracing::info_span!(
            "mnemos.search",
            query = %$query,
            include_historical = $include_historical
        )
    };
}

/// Create a capture span.
#[macro_export]
macro_rules! capture_span {
    ($source:expr, $signal_count:expr) => {
        tracing::info_span!("mnemos.capture", source = %$source, signals = $signal_count)
    };
}

/// Create a supersede span.
#[macro_export]
macro_rules! supersede_span {
    ($old_id:expr) => {
        tracing::info_span!("mnemos.supersede", old_id = %$old_id)
    };
}

/// Create a cascade evaluation span.
#[macro_export]
macro_rules! cascade_span {
    ($operation:expr) => {
        tracing::debug_span!("mnemos.cascade", operation = %$operation)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SEARCH: &str = "mnemos.search";
    pub const CAPTURE: &str = "mnemos.capture";
    pub const SUPERSEDE: &str = "mnemos.supersede";
    pub const CASCADE: &str = "mnemos.cascade";
}
