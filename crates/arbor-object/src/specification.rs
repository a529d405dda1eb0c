use arbor_types::{EntityId, Identifiable};

/// Answers whether a candidate stands for one expected entity.
///
/// Handles are transient views, so comparing them directly is
/// meaningless; entity equality is id equality. The specification
/// captures the expected id at construction and matches any
/// identity-capable candidate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualObjectSpecification {
    expected: EntityId,
}

impl EqualObjectSpecification {
    /// Capture the id of the entity candidates must match.
    pub fn new<T: Identifiable + ?Sized>(expected: &T) -> Self {
        Self {
            expected: expected.id().clone(),
        }
    }

    /// Whether the candidate stands for the expected entity.
    pub fn is_satisfied_by<T: Identifiable + ?Sized>(&self, candidate: &T) -> bool {
        candidate.id() == &self.expected
    }
}
