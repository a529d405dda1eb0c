use arbor_store::{InMemoryStateStore, StateStore};
use arbor_types::EntityId;
use tracing::debug;

use crate::error::{ObjectError, ObjectResult};
use crate::generator::{IdGenerator, UuidIdGenerator};
use crate::object::StatefulObject;

/// Issues entity handles over one backing store.
///
/// The repository owns the store and the id generator; handles borrow
/// the repository, so it outlives every handle it issues and cannot be
/// closed while one is alive.
///
/// All ids the repository creates are namespaced exactly once:
/// generator tokens become `internal-` ids, caller-chosen root tokens
/// become `root-` ids. The two can never collide, whatever tokens the
/// generator or the caller produce.
pub struct ObjectRepository {
    store: Box<dyn StateStore>,
    ids: Box<dyn IdGenerator>,
}

impl ObjectRepository {
    /// Wrap a backing store, minting ids with the default UUID
    /// generator.
    pub fn new(store: impl StateStore + 'static) -> Self {
        Self::with_id_generator(store, UuidIdGenerator)
    }

    /// Wrap a backing store with a caller-chosen id generator.
    pub fn with_id_generator(
        store: impl StateStore + 'static,
        ids: impl IdGenerator + 'static,
    ) -> Self {
        Self {
            store: Box::new(store),
            ids: Box::new(ids),
        }
    }

    /// A repository over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStateStore::new())
    }

    pub(crate) fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    /// Allocate a new entity: draw a token, namespace it as an
    /// internal id, register it, and hand back its handle.
    pub fn get_new(&self) -> ObjectResult<StatefulObject<'_>> {
        let id = EntityId::internal(&self.ids.next_token());
        self.store.register(&id)?;
        debug!(id = %id, "allocated entity");
        Ok(StatefulObject::bind(id, self))
    }

    /// A handle over an existing entity.
    ///
    /// The id is taken as is, never prefixed. Fails
    /// [`ObjectError::NotFound`] unless the id was registered by
    /// `get_new` on this store.
    pub fn get(&self, id: &EntityId) -> ObjectResult<StatefulObject<'_>> {
        if !self.store.is_registered(id)? {
            return Err(ObjectError::NotFound(id.clone()));
        }
        Ok(StatefulObject::bind(id.clone(), self))
    }

    /// A handle anchored to a caller-chosen external token.
    ///
    /// The token is namespaced as a root id, so the same token names
    /// the same state on every call and across restarts of a
    /// persistent store. Nothing is written or checked here: a fresh
    /// root simply reads as unset until its first write. Root ids are
    /// never registered, so `get` does not resolve them.
    pub fn get_root(&self, token: &str) -> StatefulObject<'_> {
        let id = EntityId::root(token);
        debug!(id = %id, "opened root handle");
        StatefulObject::bind(id, self)
    }

    /// Release the backing store.
    ///
    /// Consumes the repository, so closing twice or touching entities
    /// afterwards does not compile.
    pub fn close(mut self) -> ObjectResult<()> {
        debug!("closing repository");
        self.store.close()?;
        Ok(())
    }
}
