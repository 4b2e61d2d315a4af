#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Splunk REST decoding
//!
//! This crate turns responses of the Splunk REST API into typed Rust values.
//! It sits between an HTTP transport and application code:
//!
//! ```text
//! Transport ──▶ Response ──┬──▶ AtomFeed ──▶ Snapshot ──▶ Resource / EntityCollection<T>
//!                          │
//!                          └──▶ SearchResultStream ──▶ SearchResult (one row at a time)
//!
//!                 ValueConverter<T>: raw Value ──▶ T, chosen per field by the caller
//! ```
//!
//! ## Key Features
//!
//! - **Single-use responses**: decoders take a [`Response`] by value, check its
//!   status first, and release its body exactly once
//! - **Per-call encoding**: [`DecodeOptions`] carries the character encoding
//!   override for one decode, never global state
//! - **Atomic snapshots**: a [`Resource`] swaps its whole [`Snapshot`] in one
//!   step, so readers never see half an update
//! - **Factory-built collections**: [`EntityCollection`] builds typed entities
//!   with a closure supplied by the caller
//! - **Streaming rows**: [`SearchResultStream`] decodes one row at a time as
//!   bytes arrive, with deadlines and disposal from any state
//! - **Explicit conversion**: field values stay raw until read through a
//!   strict or documented-lenient [`ValueConverter`](convert::ValueConverter)
//!
//! ## Reading a Collection
//!
//! ```ignore
//! use splunk_client::{Context, EntityCollection, Namespace};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = Context::new("https://localhost:8089")?.with_session_key("...");
//!     let apps = EntityCollection::applications(Arc::new(context), Namespace::Default);
//!
//!     apps.fetch_all().await?;
//!     println!("{} apps", apps.count());
//!     for app in apps.iter() {
//!         println!("{}: {}", app.name(), app.label()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming Search Results
//!
//! ```ignore
//! use splunk_client::{DecodeOptions, SearchResultStream};
//! use splunk_client::convert::ParseConverter;
//!
//! let options = DecodeOptions::new().with_encoding_label("iso-8859-9")?;
//! let mut results = SearchResultStream::create(response, &options).await?;
//! while let Some(row) = results.advance().await? {
//!     let count: u64 = row.get_value("count", &ParseConverter::new())?;
//!     println!("{:?}: {}", row.field_names(), count);
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Raw values, versions, namespaces and resource names
//! - **[error]** - Error types and result handling
//! - **[client]** - Responses, the transport contract and the reqwest-backed context
//! - **[atom]** - Atom feed decoding
//! - **[convert]** - Value converters
//! - **[resource]** - Snapshots, resources, entity collections and applications
//! - **[search]** - Streaming search results
//! - **[protocol]** - Wire constants and Content-Type parsing

pub mod atom;
pub mod client;
pub mod convert;
pub mod error;
pub mod protocol;
pub mod resource;
pub mod search;
pub mod types;

mod xml;

pub use atom::{AtomEntry, AtomFeed};
pub use client::{ClientConfig, Context, DecodeOptions, Response, Transport};
pub use error::{ConversionError, Result, SplunkError};
pub use resource::{Application, EntityCollection, Resource, Snapshot};
pub use search::{SearchResult, SearchResultStream};
pub use types::{Fields, Namespace, ResourceName, Value, Version};
