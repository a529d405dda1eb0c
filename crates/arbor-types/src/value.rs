use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::EntityId;

/// The four storable shapes, as wire-stable tags.
///
/// Every stored property records one of these tags next to its payload.
/// The tag strings are part of the persistence format and must not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// A single text value.
    Primitive,
    /// An ordered list of text values.
    PrimitiveList,
    /// A link to one entity, stored as its id.
    Reference,
    /// An ordered list of links to entities.
    ReferenceList,
}

impl ValueKind {
    /// The wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Primitive => "primitive",
            ValueKind::PrimitiveList => "primitive-list",
            ValueKind::Reference => "reference",
            ValueKind::ReferenceList => "reference-list",
        }
    }

    /// Decode a wire tag back into a kind.
    ///
    /// Tags are produced only by [`ValueKind::as_str`], so an unknown
    /// tag means the data was written by an incompatible writer.
    pub fn parse(tag: &str) -> Result<Self, TypeError> {
        match tag {
            "primitive" => Ok(ValueKind::Primitive),
            "primitive-list" => Ok(ValueKind::PrimitiveList),
            "reference" => Ok(ValueKind::Reference),
            "reference-list" => Ok(ValueKind::ReferenceList),
            other => Err(TypeError::UnknownKind(other.to_owned())),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored property value: payload and type tag as a single unit.
///
/// Stores traffic exclusively in `StoredValue`, so a payload can never
/// be observed with the wrong tag and a half-written (payload without
/// tag) state is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum StoredValue {
    /// A single text value.
    Primitive(String),
    /// An ordered list of text values.
    PrimitiveList(Vec<String>),
    /// A link to one entity.
    Reference(EntityId),
    /// An ordered list of links to entities.
    ReferenceList(Vec<EntityId>),
}

impl StoredValue {
    /// The tag describing this value's shape.
    pub fn kind(&self) -> ValueKind {
        match self {
            StoredValue::Primitive(_) => ValueKind::Primitive,
            StoredValue::PrimitiveList(_) => ValueKind::PrimitiveList,
            StoredValue::Reference(_) => ValueKind::Reference,
            StoredValue::ReferenceList(_) => ValueKind::ReferenceList,
        }
    }

    /// Whether this value is one of the two list shapes.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            StoredValue::PrimitiveList(_) | StoredValue::ReferenceList(_)
        )
    }
}
