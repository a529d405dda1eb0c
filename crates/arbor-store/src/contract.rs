//! Conformance suite for [`StateStore`] implementations.
//!
//! Every function here asserts one clause of the store contract and
//! panics when the store under test violates it. Backend crates call
//! [`run_all`] from a test, handing over a constructor so each clause
//! starts from a fresh store:
//!
//! ```ignore
//! #[test]
//! fn meets_the_state_store_contract() {
//!     arbor_store::contract::run_all(MyStore::new);
//! }
//! ```

use arbor_types::{EntityId, StoredValue};

use crate::traits::StateStore;

fn id(token: &str) -> EntityId {
    EntityId::external(token)
}

fn text(s: &str) -> StoredValue {
    StoredValue::Primitive(s.to_owned())
}

/// A stored value is loaded back unchanged.
pub fn stores_and_loads<S: StateStore>(store: &S) {
    let owner = id("owner");
    store
        .store(&owner, "color", text("blue"))
        .expect("store failed");
    let loaded = store.load(&owner, "color").expect("load failed");
    assert_eq!(loaded, Some(text("blue")), "stored value must load back");
}

/// Repeated stores to one pair keep only the last value, even across a
/// shape change.
pub fn last_write_wins<S: StateStore>(store: &S) {
    let owner = id("owner");
    store
        .store(&owner, "p", text("first"))
        .expect("store failed");
    store
        .store(&owner, "p", text("second"))
        .expect("store failed");
    assert_eq!(
        store.load(&owner, "p").expect("load failed"),
        Some(text("second")),
        "later write must win"
    );

    let reference = StoredValue::Reference(EntityId::internal("1"));
    store
        .store(&owner, "p", reference.clone())
        .expect("store failed");
    assert_eq!(
        store.load(&owner, "p").expect("load failed"),
        Some(reference),
        "overwrite must replace payload and tag together"
    );
}

/// List payloads keep their element order.
pub fn preserves_list_order<S: StateStore>(store: &S) {
    let owner = id("owner");
    let texts = StoredValue::PrimitiveList(vec!["a".into(), "b".into(), "c".into()]);
    store
        .store(&owner, "texts", texts.clone())
        .expect("store failed");
    assert_eq!(store.load(&owner, "texts").expect("load failed"), Some(texts));

    let refs = StoredValue::ReferenceList(vec![
        EntityId::internal("1"),
        EntityId::internal("2"),
        EntityId::internal("3"),
    ]);
    store
        .store(&owner, "refs", refs.clone())
        .expect("store failed");
    assert_eq!(store.load(&owner, "refs").expect("load failed"), Some(refs));
}

/// Writes to one pair leave every other pair untouched.
pub fn isolates_entries<S: StateStore>(store: &S) {
    let first = id("first");
    let second = id("second");
    store.store(&first, "p", text("one")).expect("store failed");
    store.store(&first, "q", text("two")).expect("store failed");
    store
        .store(&second, "p", text("three"))
        .expect("store failed");

    assert_eq!(store.load(&first, "p").expect("load failed"), Some(text("one")));
    assert_eq!(store.load(&first, "q").expect("load failed"), Some(text("two")));
    assert_eq!(
        store.load(&second, "p").expect("load failed"),
        Some(text("three"))
    );
}

/// A pair that was never written loads as `None`.
pub fn missing_pairs_load_none<S: StateStore>(store: &S) {
    assert_eq!(
        store.load(&id("nobody"), "nothing").expect("load failed"),
        None,
        "an unwritten pair must load as None"
    );
}

/// Pairs whose components concatenate identically stay separate.
pub fn separates_concatenation_aliases<S: StateStore>(store: &S) {
    let cases = [
        (("ab", "c"), ("a", "bc")),
        (("name", "d"), ("n", "amed")),
        (("1", "ABCDEFGHI3XYZ"), ("13ABCDEFGHI", "XYZ")),
        (("x", ""), ("", "x")),
    ];
    for ((id_a, prop_a), (id_b, prop_b)) in cases {
        store
            .store(&id(id_a), prop_a, text("left"))
            .expect("store failed");
        store
            .store(&id(id_b), prop_b, text("right"))
            .expect("store failed");
        assert_eq!(
            store.load(&id(id_a), prop_a).expect("load failed"),
            Some(text("left")),
            "pair ({id_a:?}, {prop_a:?}) was clobbered by its alias"
        );
        assert_eq!(
            store.load(&id(id_b), prop_b).expect("load failed"),
            Some(text("right")),
            "pair ({id_b:?}, {prop_b:?}) was clobbered by its alias"
        );
    }
}

/// Every byte value as content keeps the two key orientations apart.
pub fn separates_every_byte_content<S: StateStore>(store: &S) {
    for byte in 0u8..=255 {
        let unit = char::from(byte).to_string();
        let two = unit.repeat(2);
        let three = unit.repeat(3);
        store
            .store(&id(&two), &three, text("short-long"))
            .expect("store failed");
        store
            .store(&id(&three), &two, text("long-short"))
            .expect("store failed");
        assert_eq!(
            store.load(&id(&two), &three).expect("load failed"),
            Some(text("short-long")),
            "byte {byte} collided across orientations"
        );
        assert_eq!(
            store.load(&id(&three), &two).expect("load failed"),
            Some(text("long-short")),
            "byte {byte} collided across orientations"
        );
    }
}

/// Ids answer unregistered until registered, then stay registered;
/// re-registering is not an error.
pub fn registration_is_sticky<S: StateStore>(store: &S) {
    let subject = id("subject");
    assert!(!store.is_registered(&subject).expect("is_registered failed"));
    store.register(&subject).expect("register failed");
    assert!(store.is_registered(&subject).expect("is_registered failed"));
    store.register(&subject).expect("re-register failed");
    assert!(store.is_registered(&subject).expect("is_registered failed"));
}

/// Registering one id says nothing about any other.
pub fn registration_is_per_id<S: StateStore>(store: &S) {
    store.register(&id("known")).expect("register failed");
    assert!(!store.is_registered(&id("unknown")).expect("is_registered failed"));
}

/// Property names come back in write order, repeats included.
pub fn lists_property_names_in_write_order<S: StateStore>(store: &S) {
    let owner = id("owner");
    store.store(&owner, "color", text("red")).expect("store failed");
    store.store(&owner, "size", text("xl")).expect("store failed");
    store
        .store(&owner, "color", text("blue"))
        .expect("store failed");
    assert_eq!(
        store.properties(&owner).expect("properties failed"),
        ["color", "size", "color"],
        "names must append in write order, duplicates included"
    );
}

/// An id with no writes has an empty property list.
pub fn lists_nothing_for_unwritten_ids<S: StateStore>(store: &S) {
    assert!(store
        .properties(&id("blank"))
        .expect("properties failed")
        .is_empty());
}

/// `close` succeeds on a store that was in use.
pub fn closes_cleanly<S: StateStore>(mut store: S) {
    store
        .store(&id("owner"), "p", text("v"))
        .expect("store failed");
    store.close().expect("close failed");
}

/// Run the whole suite, constructing a fresh store per clause.
pub fn run_all<S: StateStore>(make: impl Fn() -> S) {
    stores_and_loads(&make());
    last_write_wins(&make());
    preserves_list_order(&make());
    isolates_entries(&make());
    missing_pairs_load_none(&make());
    separates_concatenation_aliases(&make());
    separates_every_byte_content(&make());
    registration_is_sticky(&make());
    registration_is_per_id(&make());
    lists_property_names_in_write_order(&make());
    lists_nothing_for_unwritten_ids(&make());
    closes_cleanly(make());
}
