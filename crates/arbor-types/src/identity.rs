use crate::id::EntityId;

/// Anything that can hand out the id of the entity it stands for.
///
/// Entity handles implement this; test doubles can too. Reference
/// values accept any `Identifiable` so that linking never depends on a
/// concrete handle type.
pub trait Identifiable {
    /// The already-namespaced id of the underlying entity.
    fn id(&self) -> &EntityId;
}

/// An id stands for its own entity.
impl Identifiable for EntityId {
    fn id(&self) -> &EntityId {
        self
    }
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Box<T> {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}
