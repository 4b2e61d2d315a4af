//! Core data types shared by the decoders.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Value`] | Untyped field value (null, text, list, dict) |
//! | [`Version`] | Dotted numeric version |
//! | [`Namespace`] | User/app context of a resource |
//! | [`ResourceName`] | Path of a resource within a namespace |
//! | [`Message`] | Diagnostic message sent by the server |

mod message;
mod namespace;
mod value;
mod version;

pub use message::{Message, MessageKind};
pub use namespace::{identity_from_id, Namespace, ResourceName};
pub use value::{Fields, Value};
pub use version::Version;
