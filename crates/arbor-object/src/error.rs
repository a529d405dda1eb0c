use arbor_store::StoreError;
use arbor_types::{EntityId, TypeError};

/// Errors from repository and object operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// An object-shaped value lacks the identity capability where one
    /// is required.
    #[error("value has no identity and cannot be stored as a reference")]
    MissingIdentity,

    /// A scalar value is neither text nor identity-capable.
    #[error("cannot store a value of type {0}")]
    UnsupportedType(&'static str),

    /// A stored type tag is not one of the four known variants.
    ///
    /// The typed store contract cannot produce this; it surfaces from
    /// backends that persist tags textually and meet foreign data.
    #[error("unexpected stored type: {0}")]
    UnexpectedType(String),

    /// A referenced or directly requested id is not registered.
    #[error("id does not exist: {0}")]
    NotFound(EntityId),

    /// An undefined value appeared where a storable value is required.
    #[error("undefined values cannot be stored")]
    UndefinedValue,

    /// A list mixes text and references, or an append crosses the
    /// property's stored domain.
    #[error("text and references cannot share one property")]
    MixedListUnsupported,

    /// Backing-store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TypeError> for ObjectError {
    fn from(error: TypeError) -> Self {
        match error {
            TypeError::UnknownKind(tag) => ObjectError::UnexpectedType(tag),
        }
    }
}

/// Result alias for repository and object operations.
pub type ObjectResult<T> = Result<T, ObjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_surfaces_as_unexpected_type() {
        let converted: ObjectError = TypeError::UnknownKind("blob".to_owned()).into();
        assert_eq!(converted, ObjectError::UnexpectedType("blob".to_owned()));
    }

    #[test]
    fn store_errors_pass_through() {
        let converted: ObjectError = StoreError::Closed.into();
        assert_eq!(converted, ObjectError::Store(StoreError::Closed));
        assert_eq!(converted.to_string(), "store is closed");
    }

    #[test]
    fn not_found_names_the_id() {
        let error = ObjectError::NotFound(EntityId::internal("9"));
        assert_eq!(error.to_string(), "id does not exist: internal-9");
    }
}
