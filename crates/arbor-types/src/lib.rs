//! Foundation types for Arbor, a schema-less object-graph store.
//!
//! This crate provides the identifier, namespace, and value types used
//! throughout the Arbor system. Every other Arbor crate depends on
//! `arbor-types`.
//!
//! # Key Types
//!
//! - [`EntityId`] -- opaque string identifier for one entity
//! - [`IdNamespace`] -- the internal/root/external id classes and their prefixes
//! - [`StoredValue`] -- tagged value model: primitives, references, and lists of either
//! - [`ValueKind`] -- the four type tags, with their wire-level string forms
//! - [`Identifiable`] -- the identity capability that marks a value as reference-worthy

pub mod error;
pub mod id;
pub mod identity;
pub mod value;

pub use error::TypeError;
pub use id::{EntityId, IdNamespace};
pub use identity::Identifiable;
pub use value::{StoredValue, ValueKind};
