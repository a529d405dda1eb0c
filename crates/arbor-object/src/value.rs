use arbor_types::{EntityId, Identifiable};

/// A dynamically shaped value handed to `set` or `add`.
///
/// Callers supply whatever shape they hold; the object handle decides
/// which shapes are storable and how. Only text and identity-capable
/// values ever reach the store; the other variants exist so the
/// rejection rules can be stated and tested precisely.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value at all.
    Undefined,
    /// A text scalar.
    Text(String),
    /// A numeric scalar. Not storable on its own.
    Number(f64),
    /// A boolean scalar. Not storable on its own.
    Bool(bool),
    /// An object-shaped value without the identity capability.
    Record(serde_json::Map<String, serde_json::Value>),
    /// An entity, reduced to its id at construction.
    Entity(EntityId),
    /// A flat list of elements.
    List(Vec<Item>),
}

/// One element of a [`Value::List`].
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A hole in the list.
    Undefined,
    /// A text element.
    Text(String),
    /// A numeric element.
    Number(f64),
    /// A boolean element.
    Bool(bool),
    /// An object-shaped element without the identity capability.
    Record(serde_json::Map<String, serde_json::Value>),
    /// An entity element, reduced to its id.
    Entity(EntityId),
}

impl Value {
    /// Capture any identity-capable value as an entity reference.
    pub fn entity<T: Identifiable + ?Sized>(source: &T) -> Self {
        Value::Entity(source.id().clone())
    }

    /// Capture a sequence of identity-capable values as a reference list.
    pub fn entities<I, T>(sources: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Identifiable,
    {
        Value::List(
            sources
                .into_iter()
                .map(|source| Item::Entity(source.id().clone()))
                .collect(),
        )
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Text(_) => "text",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Record(_) => "record",
            Value::Entity(_) => "entity",
            Value::List(_) => "list",
        }
    }
}

impl Item {
    /// Capture any identity-capable value as an entity element.
    pub fn entity<T: Identifiable + ?Sized>(source: &T) -> Self {
        Item::Entity(source.id().clone())
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Item::Undefined => "undefined",
            Item::Text(_) => "text",
            Item::Number(_) => "number",
            Item::Bool(_) => "boolean",
            Item::Record(_) => "record",
            Item::Entity(_) => "entity",
        }
    }

    /// Render the element to text. Numbers and booleans take their
    /// display form, entities their id, records their compact JSON.
    pub(crate) fn into_text(self) -> String {
        match self {
            Item::Undefined => "undefined".to_owned(),
            Item::Text(text) => text,
            Item::Number(number) => number.to_string(),
            Item::Bool(flag) => flag.to_string(),
            Item::Record(map) => serde_json::Value::Object(map).to_string(),
            Item::Entity(id) => id.to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<Vec<Item>> for Value {
    fn from(items: Vec<Item>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<String>> for Value {
    fn from(texts: Vec<String>) -> Self {
        Value::List(texts.into_iter().map(Item::Text).collect())
    }
}

impl From<Vec<&str>> for Value {
    fn from(texts: Vec<&str>) -> Self {
        Value::List(texts.into_iter().map(Item::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(texts: [&str; N]) -> Self {
        Value::List(texts.into_iter().map(Item::from).collect())
    }
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Item::Text(text.to_owned())
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Item::Text(text)
    }
}

impl From<bool> for Item {
    fn from(flag: bool) -> Self {
        Item::Bool(flag)
    }
}

impl From<f64> for Item {
    fn from(number: f64) -> Self {
        Item::Number(number)
    }
}

impl From<EntityId> for Item {
    fn from(id: EntityId) -> Self {
        Item::Entity(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeObject {
        id: EntityId,
    }

    impl Identifiable for FakeObject {
        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    #[test]
    fn entity_captures_the_id_at_construction() {
        let fake = FakeObject {
            id: EntityId::internal("7"),
        };
        assert_eq!(
            Value::entity(&fake),
            Value::Entity(EntityId::internal("7"))
        );
    }

    #[test]
    fn entities_captures_ids_in_order() {
        let first = FakeObject {
            id: EntityId::internal("1"),
        };
        let second = FakeObject {
            id: EntityId::internal("2"),
        };
        assert_eq!(
            Value::entities([&first, &second]),
            Value::List(vec![
                Item::Entity(EntityId::internal("1")),
                Item::Entity(EntityId::internal("2")),
            ])
        );
    }

    #[test]
    fn text_conversions_build_text_values() {
        assert_eq!(Value::from("a"), Value::Text("a".to_owned()));
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::List(vec![Item::from("a"), Item::from("b")])
        );
        assert_eq!(Value::from(["a", "b"]), Value::from(vec!["a", "b"]));
    }

    #[test]
    fn rendering_is_total_over_element_shapes() {
        assert_eq!(Item::from("plain").into_text(), "plain");
        assert_eq!(Item::from(12.5).into_text(), "12.5");
        assert_eq!(Item::from(true).into_text(), "true");
        assert_eq!(
            Item::Entity(EntityId::internal("9")).into_text(),
            "internal-9"
        );

        let mut map = serde_json::Map::new();
        map.insert("a".to_owned(), serde_json::Value::from(1));
        assert_eq!(Item::Record(map).into_text(), "{\"a\":1}");
    }

    #[test]
    fn kind_names_match_the_shapes() {
        assert_eq!(Value::Undefined.kind_name(), "undefined");
        assert_eq!(Value::from(1.0).kind_name(), "number");
        assert_eq!(Value::from(false).kind_name(), "boolean");
        assert_eq!(Item::Undefined.kind_name(), "undefined");
        assert_eq!(Item::from(1.0).kind_name(), "number");
    }
}
