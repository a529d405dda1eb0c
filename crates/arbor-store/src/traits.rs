use arbor_types::{EntityId, StoredValue};

use crate::error::StoreResult;

/// Backing store for entity state.
///
/// All implementations must satisfy these invariants:
/// - A property's payload and type tag travel as one [`StoredValue`];
///   readers never observe one without the other.
/// - Distinct `(id, property)` pairs never share a slot, however the two
///   strings happen to concatenate.
/// - `store` overwrites unconditionally, shape changes included.
/// - Registration is the only existence signal; the store itself never
///   invents or rejects ids.
/// - All backend failures are propagated, never silently ignored.
pub trait StateStore: Send + Sync {
    /// Write one property of one entity, replacing any previous value.
    ///
    /// Also appends `property` to the entity's property-name list, even
    /// when the name was written before.
    fn store(&self, id: &EntityId, property: &str, value: StoredValue) -> StoreResult<()>;

    /// Read one property of one entity.
    ///
    /// Returns `Ok(None)` for a pair that was never written.
    fn load(&self, id: &EntityId, property: &str) -> StoreResult<Option<StoredValue>>;

    /// Mark an id as existing. Idempotent.
    fn register(&self, id: &EntityId) -> StoreResult<()>;

    /// Whether an id was ever registered.
    fn is_registered(&self, id: &EntityId) -> StoreResult<bool>;

    /// The names of every property ever written for an id, in write
    /// order. Names repeat when they were written repeatedly.
    fn properties(&self, id: &EntityId) -> StoreResult<Vec<String>>;

    /// Release any underlying resource.
    ///
    /// Called at most once per store instance; behavior of any later
    /// operation is left to the implementation.
    fn close(&mut self) -> StoreResult<()>;
}
