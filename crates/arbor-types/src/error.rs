use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A stored type tag is not one of the four known variants. Such a
    /// tag can only come from data written by an incompatible writer.
    #[error("unknown value kind tag: {0:?}")]
    UnknownKind(String),
}
