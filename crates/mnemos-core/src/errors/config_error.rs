/// Configuration errors. Surfaced at startup and never recovered.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("invalid value for {key}: {value:?}")]
    InvalidOverride { key: String, value: String },

    #[error("config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("required option missing: {key}")]
    Missing { key: String },
}
