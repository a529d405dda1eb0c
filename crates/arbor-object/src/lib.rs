//! Entity repository and handles for Arbor, a schema-less object-graph
//! store.
//!
//! An [`ObjectRepository`] issues [`StatefulObject`] handles over the
//! entities of one backing store. Entities have no schema: any property
//! name can hold text, a list of texts, a reference to another entity,
//! or a list of references. References are captured from anything
//! carrying the identity capability and resolve back to live handles on
//! read, which is the sole mechanism for composing entities into a
//! graph.
//!
//! # Entry Points
//!
//! - [`ObjectRepository::in_memory`] -- a repository over a fresh
//!   in-memory store
//! - [`ObjectRepository::new`] / [`ObjectRepository::with_id_generator`]
//!   -- a repository over any backing store, optionally with a custom
//!   id source
//!
//! # Example
//!
//! ```
//! use arbor_object::ObjectRepository;
//!
//! let repo = ObjectRepository::in_memory();
//! let house = repo.get_new()?;
//! let room = repo.get_new()?;
//! room.set("name", "bath")?;
//! house.add("rooms", &room)?;
//!
//! let rooms = house.get("rooms")?.unwrap();
//! let resolved = &rooms.as_objects().unwrap()[0];
//! assert_eq!(resolved.get("name")?.unwrap().as_text(), Some("bath"));
//! # Ok::<(), arbor_object::ObjectError>(())
//! ```

pub mod error;
pub mod generator;
pub mod object;
pub mod repository;
pub mod specification;
pub mod value;

pub use error::{ObjectError, ObjectResult};
pub use generator::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use object::{Retrieved, StatefulObject};
pub use repository::ObjectRepository;
pub use specification::EqualObjectSpecification;
pub use value::{Item, Value};
