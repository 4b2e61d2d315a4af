//! REST client plumbing consumed by the decoders.
//!
//! This module provides the two contracts the decoders depend on:
//!
//! - **[`Response`]**: one completed exchange, with status, headers, an
//!   overridable character encoding and a single-use body stream
//! - **[`Transport`]**: "give me the response for this namespace and name",
//!   implemented over `reqwest` by [`Context`]
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── config   - ClientConfig and per-call DecodeOptions
//! ├── fetch    - Transport trait and the reqwest-backed Context
//! ├── response - Response and its body lifecycle
//! ├── text     - Streaming byte-to-text decoding
//! └── utils    - Status code classification
//! ```
//!
//! # Examples
//!
//! ```
//! use splunk_client::client::{is_retryable_status, DecodeOptions, Response};
//!
//! assert!(is_retryable_status(503));
//! assert!(!is_retryable_status(404));
//!
//! let mut response = Response::from_bytes(200, "<feed/>");
//! response.set_encoding(encoding_rs::UTF_8).unwrap();
//! let options = DecodeOptions::new().expect_status([200, 201]);
//! # let _ = (response, options);
//! ```

mod config;
mod fetch;
mod response;
mod text;
mod utils;

pub use config::{ClientConfig, DecodeOptions};
pub use fetch::{Context, Transport};
pub use response::{BodyStream, Response};
pub(crate) use text::TextDecoder;
pub use utils::*;
