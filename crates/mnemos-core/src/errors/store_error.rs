/// Record store collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {message}")]
    Backend { message: String },

    #[error("store call {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("duplicate record id: {id}")]
    DuplicateId { id: String },

    #[error("migration v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },
}
