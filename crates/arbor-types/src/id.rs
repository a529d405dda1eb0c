use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix for ids minted by the repository's own generator.
const INTERNAL_PREFIX: &str = "internal-";

/// Prefix for root ids anchored to a caller-chosen external token.
const ROOT_PREFIX: &str = "root-";

/// Opaque identifier for one entity within a backing store.
///
/// An `EntityId` is an arbitrary string token. The repository namespaces
/// the ids it creates with the [`IdNamespace`] prefixes so that
/// generator-minted ids, caller-anchored root ids, and raw external
/// tokens can never alias each other. Prefixing is applied exactly once
/// per id, and only by the repository.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Namespace a generator token as an internal id: `internal-{token}`.
    pub fn internal(token: &str) -> Self {
        Self(format!("{INTERNAL_PREFIX}{token}"))
    }

    /// Namespace a caller-chosen token as a root id: `root-{token}`.
    pub fn root(token: &str) -> Self {
        Self(format!("{ROOT_PREFIX}{token}"))
    }

    /// Wrap an already-complete id without applying any prefix.
    ///
    /// This is the path for ids handed back by an entity (`id()`), which
    /// are already namespaced, and for raw tokens owned by a foreign
    /// system.
    pub fn external(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode which id class this id belongs to.
    ///
    /// Decoding is purely syntactic: an external token that happens to
    /// start with a namespace prefix decodes as that class. The
    /// non-collision guarantee covers repository-created ids, which are
    /// prefixed exactly once.
    pub fn namespace(&self) -> IdNamespace<'_> {
        if let Some(token) = self.0.strip_prefix(INTERNAL_PREFIX) {
            IdNamespace::Internal(token)
        } else if let Some(token) = self.0.strip_prefix(ROOT_PREFIX) {
            IdNamespace::Root(token)
        } else {
            IdNamespace::External(&self.0)
        }
    }
}

/// The three id classes the repository keeps apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdNamespace<'a> {
    /// Minted by the repository from a generator token.
    Internal(&'a str),
    /// Anchored to a caller-chosen external token.
    Root(&'a str),
    /// A raw token, never prefixed by the repository.
    External(&'a str),
}

impl IdNamespace<'_> {
    /// The token carried inside the namespace.
    pub fn token(&self) -> &str {
        match self {
            IdNamespace::Internal(token)
            | IdNamespace::Root(token)
            | IdNamespace::External(token) => token,
        }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::external(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self::external(id)
    }
}
