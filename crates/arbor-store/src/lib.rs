//! Backing-store layer for Arbor.
//!
//! Entities live in whatever storage a deployment plugs in; this crate
//! defines the contract that makes the rest of Arbor indifferent to the
//! choice. A backing store is a flat keyed map from `(id, property)`
//! pairs to tagged values, plus an id registry and per-id property-name
//! bookkeeping.
//!
//! # Pieces
//!
//! - [`StateStore`] -- the contract every backend implements
//! - [`compose_key`] -- injective `(id, property)` key composition
//! - [`InMemoryStateStore`] -- `HashMap`-based adapter for tests and embedding
//! - [`contract`] -- conformance suite any backend can run against itself
//!
//! # Design Rules
//!
//! 1. Payload and type tag travel together; a half-written property is
//!    unrepresentable.
//! 2. Distinct `(id, property)` pairs never share a slot, however the
//!    strings concatenate.
//! 3. The store never interprets values and never invents ids.
//! 4. All backend failures are propagated, never silently ignored.

pub mod contract;
pub mod error;
pub mod key;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use key::compose_key;
pub use memory::InMemoryStateStore;
pub use traits::StateStore;
