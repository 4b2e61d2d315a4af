//! Entities, their snapshots, and collections of entities.
//!
//! # Identity and Content
//!
//! A [`Resource`] pairs a fixed identity (namespace and resource name) with a
//! current [`Snapshot`] of its fields. Content changes only by swapping in a
//! whole new snapshot:
//!
//! ```text
//! Resource { namespace, name, RwLock<Arc<Snapshot>> }
//!                                      │
//!            refresh(new) ─────────────┘  one pointer swap
//! ```
//!
//! Readers clone the `Arc` and keep reading the snapshot they got, however
//! many refreshes happen meanwhile.
//!
//! # Typed Entities
//!
//! An [`EntityCollection`] builds its entities with a factory closure, so any
//! wrapper type with a `From<Resource>` or a constructor function works:
//!
//! | Type | Resource name | Factory |
//! |------|---------------|---------|
//! | [`Application`] | `apps/local` | `Application::from` |
//! | your own | any | `Fn(Resource) -> T` |
//!
//! # Field Access
//!
//! Fields stay raw until read through a converter of the caller's choice, see
//! [`Snapshot::get_value`]. The only field typed on construction is
//! `eai:acl`, exposed as [`Acl`].

mod acl;
mod application;
mod collection;
mod entity;
mod snapshot;

pub use acl::{Acl, AclConverter, Permissions, Sharing};
pub use application::Application;
pub use collection::{CollectionSnapshot, EntityCollection, EntityFactory};
pub use entity::Resource;
pub use snapshot::{Snapshot, ACL_FIELD};
