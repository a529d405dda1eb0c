use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use arbor_types::{EntityId, StoredValue};

use crate::error::{StoreError, StoreResult};
use crate::key::compose_key;
use crate::traits::StateStore;

/// In-memory, HashMap-based backing store.
///
/// Intended for tests and embedding. Values are keyed by the composed
/// `(id, property)` key and held behind `RwLock`s for safe concurrent
/// access; values are cloned on read and write. Data is lost when the
/// store is dropped.
pub struct InMemoryStateStore {
    values: RwLock<HashMap<String, StoredValue>>,
    registered: RwLock<HashSet<EntityId>>,
    names: RwLock<HashMap<EntityId, Vec<String>>>,
    closed: AtomicBool,
}

impl InMemoryStateStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            registered: RwLock::new(HashSet::new()),
            names: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of property slots currently stored.
    pub fn len(&self) -> usize {
        self.values.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.values.read().expect("lock poisoned").is_empty()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn store(&self, id: &EntityId, property: &str, value: StoredValue) -> StoreResult<()> {
        self.ensure_open()?;
        let mut values = self
            .values
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        values.insert(compose_key(id.as_str(), property), value);
        drop(values);

        let mut names = self
            .names
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        names
            .entry(id.clone())
            .or_default()
            .push(property.to_owned());
        Ok(())
    }

    fn load(&self, id: &EntityId, property: &str) -> StoreResult<Option<StoredValue>> {
        self.ensure_open()?;
        let values = self
            .values
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(values.get(&compose_key(id.as_str(), property)).cloned())
    }

    fn register(&self, id: &EntityId) -> StoreResult<()> {
        self.ensure_open()?;
        let mut registered = self
            .registered
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        registered.insert(id.clone());
        Ok(())
    }

    fn is_registered(&self, id: &EntityId) -> StoreResult<bool> {
        self.ensure_open()?;
        let registered = self
            .registered
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(registered.contains(id))
    }

    fn properties(&self, id: &EntityId) -> StoreResult<Vec<String>> {
        self.ensure_open()?;
        let names = self
            .names
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(names.get(id).cloned().unwrap_or_default())
    }

    fn close(&mut self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(StoreError::Closed);
        }
        self.values
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?
            .clear();
        self.registered
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?
            .clear();
        self.names
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?
            .clear();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStateStore")
            .field("slot_count", &self.len())
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}
