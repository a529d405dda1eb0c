use std::fmt;

use arbor_types::{EntityId, Identifiable, StoredValue};

use crate::error::{ObjectError, ObjectResult};
use crate::repository::ObjectRepository;
use crate::value::{Item, Value};

/// A handle over one entity's state.
///
/// Handles are transient views: they cache nothing, and every `set`,
/// `get`, and `add` goes straight to the backing store, so all handles
/// over one id observe writes immediately. The repository that issued a
/// handle outlives it; the borrow makes that a compile-time fact.
#[derive(Clone)]
pub struct StatefulObject<'r> {
    id: EntityId,
    repository: &'r ObjectRepository,
}

/// A property value as handed back by [`StatefulObject::get`], with
/// references already resolved to live handles.
#[derive(Debug)]
pub enum Retrieved<'r> {
    /// A text scalar.
    Text(String),
    /// A list of texts, in insertion order.
    Texts(Vec<String>),
    /// A resolved entity.
    Object(StatefulObject<'r>),
    /// A list of resolved entities, in insertion order.
    Objects(Vec<StatefulObject<'r>>),
}

impl<'r> Retrieved<'r> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Retrieved::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_texts(&self) -> Option<&[String]> {
        match self {
            Retrieved::Texts(texts) => Some(texts),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&StatefulObject<'r>> {
        match self {
            Retrieved::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_objects(&self) -> Option<&[StatefulObject<'r>]> {
        match self {
            Retrieved::Objects(objects) => Some(objects),
            _ => None,
        }
    }
}

impl<'r> StatefulObject<'r> {
    pub(crate) fn bind(id: EntityId, repository: &'r ObjectRepository) -> Self {
        Self { id, repository }
    }

    /// The id of the entity this handle stands for.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Overwrite one property, whatever it held before.
    ///
    /// Text values and text-first lists store as text; identity-capable
    /// values and object-first lists store as references. Lists are
    /// classified by their first element only, so a text-first list
    /// swallows later elements of any shape by rendering them to text
    /// (`add` is stricter). Numeric, boolean, and undefined scalars fail
    /// [`ObjectError::UnsupportedType`]; object-shaped values without an
    /// identity fail [`ObjectError::MissingIdentity`]; a hole in any
    /// list fails [`ObjectError::UndefinedValue`].
    pub fn set(&self, property: &str, value: impl Into<Value>) -> ObjectResult<()> {
        let stored = classify_overwrite(value.into())?;
        self.repository.store().store(&self.id, property, stored)?;
        Ok(())
    }

    /// Read one property.
    ///
    /// Returns `Ok(None)` for a property never written. Stored
    /// references resolve through the repository into live handles;
    /// a dangling id fails [`ObjectError::NotFound`], and a reference
    /// list aborts on its first unresolved id without returning any
    /// partial list.
    pub fn get(&self, property: &str) -> ObjectResult<Option<Retrieved<'r>>> {
        let Some(stored) = self.repository.store().load(&self.id, property)? else {
            return Ok(None);
        };
        let retrieved = match stored {
            StoredValue::Primitive(text) => Retrieved::Text(text),
            StoredValue::PrimitiveList(texts) => Retrieved::Texts(texts),
            StoredValue::Reference(id) => Retrieved::Object(self.repository.get(&id)?),
            StoredValue::ReferenceList(ids) => {
                let mut objects = Vec::with_capacity(ids.len());
                for id in &ids {
                    objects.push(self.repository.get(id)?);
                }
                Retrieved::Objects(objects)
            }
        };
        Ok(Some(retrieved))
    }

    /// Append to one property, merging with whatever it holds.
    ///
    /// The current value and the addition normalize to lists (scalars
    /// become one-element lists), concatenate existing-before-new, and
    /// store back as a list; a scalar property stays list-typed forever
    /// after its first `add`. Appends never cross the property's
    /// domain: adding text onto references or references onto text
    /// fails [`ObjectError::MixedListUnsupported`], as does a list
    /// carrying both in itself. Undefined values and holes fail
    /// [`ObjectError::UndefinedValue`]. An empty list is a no-op for
    /// every current state. Exactly one store write happens on success,
    /// none on rejection.
    pub fn add(&self, property: &str, value: impl Into<Value>) -> ObjectResult<()> {
        let current = self.repository.store().load(&self.id, property)?;
        match merge_append(current, value.into())? {
            Some(merged) => {
                self.repository.store().store(&self.id, property, merged)?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// The names of every property ever written on this entity, in
    /// write order. A name repeats for every rewrite.
    pub fn properties(&self) -> ObjectResult<Vec<String>> {
        Ok(self.repository.store().properties(&self.id)?)
    }
}

impl Identifiable for StatefulObject<'_> {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl fmt::Debug for StatefulObject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatefulObject").field("id", &self.id).finish()
    }
}

impl From<&StatefulObject<'_>> for Value {
    fn from(object: &StatefulObject<'_>) -> Self {
        Value::Entity(object.id.clone())
    }
}

impl From<&StatefulObject<'_>> for Item {
    fn from(object: &StatefulObject<'_>) -> Self {
        Item::Entity(object.id.clone())
    }
}

impl From<Vec<&StatefulObject<'_>>> for Value {
    fn from(objects: Vec<&StatefulObject<'_>>) -> Self {
        Value::List(objects.into_iter().map(Item::from).collect())
    }
}

impl<const N: usize> From<[&StatefulObject<'_>; N]> for Value {
    fn from(objects: [&StatefulObject<'_>; N]) -> Self {
        Value::List(objects.into_iter().map(Item::from).collect())
    }
}

/// The two storable domains a property can live in.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Domain {
    Text,
    Object,
}

fn stored_domain(value: &StoredValue) -> Domain {
    match value {
        StoredValue::Primitive(_) | StoredValue::PrimitiveList(_) => Domain::Text,
        StoredValue::Reference(_) | StoredValue::ReferenceList(_) => Domain::Object,
    }
}

fn item_domain(item: &Item) -> Option<Domain> {
    match item {
        Item::Text(_) => Some(Domain::Text),
        Item::Entity(_) | Item::Record(_) => Some(Domain::Object),
        Item::Number(_) | Item::Bool(_) | Item::Undefined => None,
    }
}

fn addition_domain(value: &Value) -> Option<Domain> {
    match value {
        Value::Text(_) => Some(Domain::Text),
        Value::Entity(_) | Value::Record(_) => Some(Domain::Object),
        Value::List(items) => items.first().and_then(item_domain),
        Value::Number(_) | Value::Bool(_) | Value::Undefined => None,
    }
}

fn classify_overwrite(value: Value) -> ObjectResult<StoredValue> {
    match value {
        Value::Text(text) => Ok(StoredValue::Primitive(text)),
        Value::Entity(id) => Ok(StoredValue::Reference(id)),
        Value::Record(_) => Err(ObjectError::MissingIdentity),
        Value::List(items) => classify_overwrite_list(items),
        other => Err(ObjectError::UnsupportedType(other.kind_name())),
    }
}

fn classify_overwrite_list(items: Vec<Item>) -> ObjectResult<StoredValue> {
    if items.iter().any(|item| matches!(item, Item::Undefined)) {
        return Err(ObjectError::UndefinedValue);
    }
    match items.first() {
        // An empty list carries no type evidence; it stores as text.
        None => Ok(StoredValue::PrimitiveList(Vec::new())),
        Some(Item::Text(_)) => Ok(StoredValue::PrimitiveList(
            items.into_iter().map(Item::into_text).collect(),
        )),
        Some(Item::Entity(_) | Item::Record(_)) => {
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Item::Entity(id) => ids.push(id),
                    _ => return Err(ObjectError::MissingIdentity),
                }
            }
            Ok(StoredValue::ReferenceList(ids))
        }
        Some(first) => Err(ObjectError::UnsupportedType(first.kind_name())),
    }
}

/// Merged list for an append, or `None` for the empty-list no-op.
fn merge_append(
    current: Option<StoredValue>,
    addition: Value,
) -> ObjectResult<Option<StoredValue>> {
    if matches!(addition, Value::Undefined) {
        return Err(ObjectError::UndefinedValue);
    }
    if let Value::List(items) = &addition {
        if items.iter().any(|item| matches!(item, Item::Undefined)) {
            return Err(ObjectError::UndefinedValue);
        }
        let has_text = items.iter().any(|item| matches!(item, Item::Text(_)));
        let has_entity = items.iter().any(|item| matches!(item, Item::Entity(_)));
        if has_text && has_entity {
            return Err(ObjectError::MixedListUnsupported);
        }
    }

    if let (Some(current_domain), Some(new_domain)) = (
        current.as_ref().map(stored_domain),
        addition_domain(&addition),
    ) {
        if current_domain != new_domain {
            return Err(ObjectError::MixedListUnsupported);
        }
    }

    if matches!(&addition, Value::List(items) if items.is_empty()) {
        return Ok(None);
    }

    let merged = match (current, convert_addition(addition)?) {
        (None, Appended::Texts(new)) => StoredValue::PrimitiveList(new),
        (Some(StoredValue::Primitive(existing)), Appended::Texts(new)) => {
            let mut list = Vec::with_capacity(new.len() + 1);
            list.push(existing);
            list.extend(new);
            StoredValue::PrimitiveList(list)
        }
        (Some(StoredValue::PrimitiveList(mut list)), Appended::Texts(new)) => {
            list.extend(new);
            StoredValue::PrimitiveList(list)
        }
        (None, Appended::Ids(new)) => StoredValue::ReferenceList(new),
        (Some(StoredValue::Reference(existing)), Appended::Ids(new)) => {
            let mut list = Vec::with_capacity(new.len() + 1);
            list.push(existing);
            list.extend(new);
            StoredValue::ReferenceList(list)
        }
        (Some(StoredValue::ReferenceList(mut list)), Appended::Ids(new)) => {
            list.extend(new);
            StoredValue::ReferenceList(list)
        }
        _ => return Err(ObjectError::MixedListUnsupported),
    };
    Ok(Some(merged))
}

/// An addition normalized to one storable domain.
enum Appended {
    Texts(Vec<String>),
    Ids(Vec<EntityId>),
}

fn convert_addition(addition: Value) -> ObjectResult<Appended> {
    match addition {
        Value::Text(text) => Ok(Appended::Texts(vec![text])),
        Value::Entity(id) => Ok(Appended::Ids(vec![id])),
        Value::Record(_) => Err(ObjectError::MissingIdentity),
        Value::Undefined => Err(ObjectError::UndefinedValue),
        Value::List(items) => {
            let mut texts = Vec::new();
            let mut ids = Vec::new();
            for item in items {
                match item {
                    Item::Text(text) => texts.push(text),
                    Item::Entity(id) => ids.push(id),
                    Item::Record(_) => return Err(ObjectError::MissingIdentity),
                    Item::Undefined => return Err(ObjectError::UndefinedValue),
                    other => return Err(ObjectError::UnsupportedType(other.kind_name())),
                }
            }
            if ids.is_empty() {
                Ok(Appended::Texts(texts))
            } else if texts.is_empty() {
                Ok(Appended::Ids(ids))
            } else {
                Err(ObjectError::MixedListUnsupported)
            }
        }
        other => Err(ObjectError::UnsupportedType(other.kind_name())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use arbor_store::{InMemoryStateStore, StateStore, StoreResult};

    use super::*;
    use crate::generator::SequentialIdGenerator;

    fn repository() -> ObjectRepository {
        ObjectRepository::with_id_generator(InMemoryStateStore::new(), SequentialIdGenerator::new())
    }

    struct FakeObject {
        id: EntityId,
    }

    fn fake(id: &str) -> FakeObject {
        FakeObject {
            id: EntityId::external(id),
        }
    }

    impl Identifiable for FakeObject {
        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    struct CountingStore {
        inner: InMemoryStateStore,
        writes: Arc<AtomicUsize>,
    }

    impl CountingStore {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let writes = Arc::new(AtomicUsize::new(0));
            let store = Self {
                inner: InMemoryStateStore::new(),
                writes: Arc::clone(&writes),
            };
            (store, writes)
        }
    }

    impl StateStore for CountingStore {
        fn store(&self, id: &EntityId, property: &str, value: StoredValue) -> StoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.store(id, property, value)
        }

        fn load(&self, id: &EntityId, property: &str) -> StoreResult<Option<StoredValue>> {
            self.inner.load(id, property)
        }

        fn register(&self, id: &EntityId) -> StoreResult<()> {
            self.inner.register(id)
        }

        fn is_registered(&self, id: &EntityId) -> StoreResult<bool> {
            self.inner.is_registered(id)
        }

        fn properties(&self, id: &EntityId) -> StoreResult<Vec<String>> {
            self.inner.properties(id)
        }

        fn close(&mut self) -> StoreResult<()> {
            self.inner.close()
        }
    }

    // -----------------------------------------------------------------------
    // Round-trips and reads
    // -----------------------------------------------------------------------

    #[test]
    fn set_then_get_returns_the_text() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        entity.set("name", "bath").unwrap();
        let retrieved = entity.get("name").unwrap().unwrap();
        assert_eq!(retrieved.as_text(), Some("bath"));
    }

    #[test]
    fn get_of_an_unwritten_property_is_none() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        assert!(entity.get("anything").unwrap().is_none());
    }

    #[test]
    fn set_preserves_list_order() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        entity.set("tags", ["first", "second", "third"]).unwrap();
        let retrieved = entity.get("tags").unwrap().unwrap();
        assert_eq!(retrieved.as_texts().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn set_overwrites_across_shapes() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();
        entity.set("p", "text").unwrap();
        entity.set("p", &target).unwrap();
        let retrieved = entity.get("p").unwrap().unwrap();
        assert_eq!(retrieved.as_object().unwrap().id(), target.id());
    }

    #[test]
    fn set_empty_list_stores_an_empty_text_list() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        entity.set("tags", Value::List(Vec::new())).unwrap();
        let retrieved = entity.get("tags").unwrap().unwrap();
        assert!(retrieved.as_texts().unwrap().is_empty());
    }

    #[test]
    fn references_resolve_through_the_repository() {
        let repo = repository();
        let house = repo.get_new().unwrap();
        let room = repo.get_new().unwrap();
        room.set("name", "bath").unwrap();

        house.set("bathroom", &room).unwrap();

        let retrieved = house.get("bathroom").unwrap().unwrap();
        let resolved = retrieved.as_object().unwrap();
        assert_eq!(resolved.id(), room.id());
        assert_eq!(
            resolved.get("name").unwrap().unwrap().as_text(),
            Some("bath")
        );
    }

    #[test]
    fn reference_lists_resolve_in_order() {
        let repo = repository();
        let house = repo.get_new().unwrap();
        let kitchen = repo.get_new().unwrap();
        let cellar = repo.get_new().unwrap();

        house.set("rooms", [&kitchen, &cellar]).unwrap();

        let retrieved = house.get("rooms").unwrap().unwrap();
        let rooms = retrieved.as_objects().unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id(), kitchen.id());
        assert_eq!(rooms[1].id(), cellar.id());
    }

    #[test]
    fn dangling_references_fail_not_found() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let ghost = fake("ghost");
        entity.set("link", Value::entity(&ghost)).unwrap();
        assert_eq!(
            entity.get("link").unwrap_err(),
            ObjectError::NotFound(EntityId::external("ghost"))
        );
    }

    #[test]
    fn reference_list_resolution_aborts_on_the_first_missing_id() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let real = repo.get_new().unwrap();
        let ghost = fake("ghost");
        entity
            .set("links", Value::entities([real.id(), ghost.id()]))
            .unwrap();
        assert_eq!(
            entity.get("links").unwrap_err(),
            ObjectError::NotFound(EntityId::external("ghost"))
        );
    }

    #[test]
    fn two_handles_share_one_entity_state() {
        let repo = repository();
        let first = repo.get_new().unwrap();
        let second = repo.get(first.id()).unwrap();
        first.set("name", "shared").unwrap();
        assert_eq!(
            second.get("name").unwrap().unwrap().as_text(),
            Some("shared")
        );
    }

    // -----------------------------------------------------------------------
    // Overwrite rejections
    // -----------------------------------------------------------------------

    #[test]
    fn set_rejects_unstorable_scalars() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        assert_eq!(
            entity.set("p", Value::Undefined).unwrap_err(),
            ObjectError::UnsupportedType("undefined")
        );
        assert_eq!(
            entity.set("p", 12.5).unwrap_err(),
            ObjectError::UnsupportedType("number")
        );
        assert_eq!(
            entity.set("p", true).unwrap_err(),
            ObjectError::UnsupportedType("boolean")
        );
        assert!(entity.get("p").unwrap().is_none());
    }

    #[test]
    fn set_rejects_records_without_identity() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        assert_eq!(
            entity
                .set("p", Value::Record(serde_json::Map::new()))
                .unwrap_err(),
            ObjectError::MissingIdentity
        );
    }

    #[test]
    fn set_rejects_object_lists_with_incapable_elements() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();
        assert_eq!(
            entity
                .set(
                    "p",
                    Value::List(vec![
                        Item::from(&target),
                        Item::Record(serde_json::Map::new()),
                    ])
                )
                .unwrap_err(),
            ObjectError::MissingIdentity
        );
        assert_eq!(
            entity
                .set("p", Value::List(vec![Item::from(&target), Item::from(1.0)]))
                .unwrap_err(),
            ObjectError::MissingIdentity
        );
    }

    #[test]
    fn set_rejects_lists_with_holes() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();
        assert_eq!(
            entity
                .set("p", Value::List(vec![Item::from("a"), Item::Undefined]))
                .unwrap_err(),
            ObjectError::UndefinedValue
        );
        assert_eq!(
            entity
                .set("p", Value::List(vec![Item::from(&target), Item::Undefined]))
                .unwrap_err(),
            ObjectError::UndefinedValue
        );
    }

    #[test]
    fn set_renders_text_first_lists_totally() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();
        let mut map = serde_json::Map::new();
        map.insert("a".to_owned(), serde_json::Value::from(1));

        entity
            .set(
                "mixed",
                Value::List(vec![
                    Item::from("plain"),
                    Item::from(12.5),
                    Item::from(true),
                    Item::from(&target),
                    Item::Record(map),
                ]),
            )
            .unwrap();

        let retrieved = entity.get("mixed").unwrap().unwrap();
        assert_eq!(
            retrieved.as_texts().unwrap(),
            ["plain", "12.5", "true", "internal-2", "{\"a\":1}"]
        );
    }

    #[test]
    fn set_rejects_number_first_lists() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        assert_eq!(
            entity
                .set("p", Value::List(vec![Item::from(1.0), Item::from("a")]))
                .unwrap_err(),
            ObjectError::UnsupportedType("number")
        );
    }

    // -----------------------------------------------------------------------
    // Append state machine
    // -----------------------------------------------------------------------

    #[test]
    fn add_grows_a_scalar_into_a_list() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        entity.set("p", "a").unwrap();
        entity.add("p", "b").unwrap();
        let retrieved = entity.get("p").unwrap().unwrap();
        assert_eq!(retrieved.as_texts().unwrap(), ["a", "b"]);
    }

    #[test]
    fn add_onto_unset_starts_a_list() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        entity.add("p", "a").unwrap();
        let retrieved = entity.get("p").unwrap().unwrap();
        assert_eq!(retrieved.as_texts().unwrap(), ["a"]);
    }

    #[test]
    fn add_appends_lists_existing_first() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        entity.set("p", ["a", "b"]).unwrap();
        entity.add("p", ["c", "d"]).unwrap();
        let retrieved = entity.get("p").unwrap().unwrap();
        assert_eq!(retrieved.as_texts().unwrap(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn add_grows_references_the_same_way() {
        let repo = repository();
        let house = repo.get_new().unwrap();
        let first = repo.get_new().unwrap();
        let second = repo.get_new().unwrap();

        house.set("rooms", &first).unwrap();
        house.add("rooms", &second).unwrap();

        let retrieved = house.get("rooms").unwrap().unwrap();
        let rooms = retrieved.as_objects().unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id(), first.id());
        assert_eq!(rooms[1].id(), second.id());
    }

    #[test]
    fn add_onto_unset_starts_a_reference_list() {
        let repo = repository();
        let house = repo.get_new().unwrap();
        let room = repo.get_new().unwrap();
        house.add("rooms", &room).unwrap();
        let retrieved = house.get("rooms").unwrap().unwrap();
        let rooms = retrieved.as_objects().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id(), room.id());
    }

    #[test]
    fn add_empty_list_is_a_no_op_for_every_state() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();

        entity.add("unset", Value::List(Vec::new())).unwrap();
        assert!(entity.get("unset").unwrap().is_none());

        entity.set("scalar", "a").unwrap();
        entity.add("scalar", Value::List(Vec::new())).unwrap();
        assert_eq!(
            entity.get("scalar").unwrap().unwrap().as_text(),
            Some("a")
        );

        entity.set("list", ["a", "b"]).unwrap();
        entity.add("list", Value::List(Vec::new())).unwrap();
        assert_eq!(
            entity.get("list").unwrap().unwrap().as_texts().unwrap(),
            ["a", "b"]
        );

        entity.set("reference", &target).unwrap();
        entity.add("reference", Value::List(Vec::new())).unwrap();
        assert!(entity
            .get("reference")
            .unwrap()
            .unwrap()
            .as_object()
            .is_some());

        entity.set("references", [&target]).unwrap();
        entity.add("references", Value::List(Vec::new())).unwrap();
        assert_eq!(
            entity
                .get("references")
                .unwrap()
                .unwrap()
                .as_objects()
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn add_rejects_undefined() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        assert_eq!(
            entity.add("p", Value::Undefined).unwrap_err(),
            ObjectError::UndefinedValue
        );
        assert_eq!(
            entity
                .add("p", Value::List(vec![Item::from("a"), Item::Undefined]))
                .unwrap_err(),
            ObjectError::UndefinedValue
        );
        assert!(entity.get("p").unwrap().is_none());
    }

    #[test]
    fn add_rejects_lists_mixing_text_and_references() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();
        assert_eq!(
            entity
                .add("p", Value::List(vec![Item::from("a"), Item::from(&target)]))
                .unwrap_err(),
            ObjectError::MixedListUnsupported
        );
        assert!(entity.get("p").unwrap().is_none());
    }

    #[test]
    fn cross_domain_add_fails_and_preserves_state() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();

        entity.set("p", "a").unwrap();
        assert_eq!(
            entity.add("p", &target).unwrap_err(),
            ObjectError::MixedListUnsupported
        );
        assert_eq!(entity.get("p").unwrap().unwrap().as_text(), Some("a"));
    }

    #[test]
    fn cross_domain_add_fails_in_both_directions() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();

        entity.set("p", &target).unwrap();
        assert_eq!(
            entity.add("p", "text").unwrap_err(),
            ObjectError::MixedListUnsupported
        );
        assert_eq!(
            entity.get("p").unwrap().unwrap().as_object().unwrap().id(),
            target.id()
        );
    }

    #[test]
    fn add_rejects_numbers_and_booleans() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let target = repo.get_new().unwrap();
        assert_eq!(
            entity.add("p", 3.5).unwrap_err(),
            ObjectError::UnsupportedType("number")
        );
        assert_eq!(
            entity.add("p", false).unwrap_err(),
            ObjectError::UnsupportedType("boolean")
        );
        assert_eq!(
            entity
                .add("p", Value::List(vec![Item::from(&target), Item::from(2.0)]))
                .unwrap_err(),
            ObjectError::UnsupportedType("number")
        );
    }

    #[test]
    fn add_records_fail_by_domain_or_identity() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        let record = || Value::Record(serde_json::Map::new());

        // Onto an unset property the record reaches id resolution.
        assert_eq!(
            entity.add("fresh", record()).unwrap_err(),
            ObjectError::MissingIdentity
        );

        // Onto a text property the domain conflict wins.
        entity.set("texty", "a").unwrap();
        assert_eq!(
            entity.add("texty", record()).unwrap_err(),
            ObjectError::MixedListUnsupported
        );

        // Onto a reference property the domains agree, so the missing
        // identity is the failure again.
        let target = repo.get_new().unwrap();
        entity.set("refy", &target).unwrap();
        assert_eq!(
            entity.add("refy", record()).unwrap_err(),
            ObjectError::MissingIdentity
        );
    }

    #[test]
    fn mutations_write_exactly_once() {
        let (store, writes) = CountingStore::new();
        let repo = ObjectRepository::with_id_generator(store, SequentialIdGenerator::new());
        let entity = repo.get_new().unwrap();
        let intruder = fake("intruder");
        assert_eq!(writes.load(Ordering::SeqCst), 0);

        entity.set("p", "a").unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 1);

        entity.add("p", "b").unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 2);

        entity.add("p", Value::List(Vec::new())).unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 2);

        assert!(entity.add("p", Value::entity(&intruder)).is_err());
        assert_eq!(writes.load(Ordering::SeqCst), 2);

        assert!(entity.set("p", 4.0).is_err());
        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }

    // -----------------------------------------------------------------------
    // Property listing
    // -----------------------------------------------------------------------

    #[test]
    fn properties_lists_names_with_duplicates() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        entity.set("color", "red").unwrap();
        entity.set("size", "xl").unwrap();
        entity.set("color", "blue").unwrap();
        assert_eq!(entity.properties().unwrap(), ["color", "size", "color"]);
    }

    #[test]
    fn properties_of_a_fresh_entity_is_empty() {
        let repo = repository();
        let entity = repo.get_new().unwrap();
        assert!(entity.properties().unwrap().is_empty());
    }
}
