/// Errors from backing-store operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store has been closed; no further operations are accepted.
    #[error("store is closed")]
    Closed,

    /// Failure inside the storage backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
