//! Error types for Splunk REST decoding operations.
//!
//! This module defines every fault the decoding layer can surface. The
//! [`Result`] type alias provides a convenient shorthand for fallible operations.
//!
//! # Error Categories
//!
//! | Category | Variants | Retryable |
//! |----------|----------|-----------|
//! | Transport | `Transport`, `Timeout` | Yes |
//! | Status | `Status` | 408, 429, 502, 503, 504 only |
//! | Decode | `Decode`, `Format` | No |
//! | Conversion | `Conversion` | No |
//! | Usage | `Index`, `BodyConsumed`, `EncodingLocked`, `StreamClosed` | No |
//! | Configuration | `Config`, `InvalidEncoding`, `InvalidResource` | No |
//!
//! Nothing in this crate retries. [`SplunkError::is_retryable()`] exists so a
//! caller-side retry policy can classify faults.
//!
//! # Examples
//!
//! ```
//! use splunk_client::{ConversionError, SplunkError};
//!
//! let err = SplunkError::Status { status: 503, body: String::new() };
//! assert!(err.is_retryable());
//!
//! let err: SplunkError = ConversionError::InvalidFormat {
//!     expected: "version",
//!     input: "not-a-version".into(),
//! }
//! .into();
//! assert!(err.to_string().contains("not-a-version"));
//! ```

use crate::client::{is_access_denied_status, is_retryable_status};
use thiserror::Error;

/// Result type for Splunk decoding operations.
pub type Result<T> = std::result::Result<T, SplunkError>;

/// Errors that can occur while reading and decoding Splunk responses.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SplunkError {
    /// Reading from the transport failed.
    ///
    /// Fatal to the current operation. Retrying belongs to the caller.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a status outside the expected set.
    ///
    /// `body` holds the leading part of the response body as text. It is never
    /// parsed as data.
    #[error("unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// Malformed Atom XML, malformed result rows, or bytes that are invalid in
    /// the selected character encoding.
    #[error("decode error: {0}")]
    Decode(String),

    /// The body does not start with a search results payload.
    #[error("format error: {0}")]
    Format(String),

    /// A strict converter could not interpret a present field value.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Collection access outside `[0, count)`.
    #[error("index {index} is out of range for a collection of {count}")]
    Index {
        /// Requested index.
        index: usize,
        /// Number of entities in the collection.
        count: usize,
    },

    /// The response body was already handed to a consumer.
    #[error("response body has already been consumed")]
    BodyConsumed,

    /// The character encoding was changed after the body was opened.
    #[error("character encoding cannot change once the body is open")]
    EncodingLocked,

    /// Unknown character encoding label.
    #[error("unknown character encoding: {0}")]
    InvalidEncoding(String),

    /// An entry id that does not identify a REST resource.
    #[error("invalid resource identifier: {0}")]
    InvalidResource(String),

    /// The stream was closed and can no longer produce rows.
    #[error("search result stream is closed")]
    StreamClosed,

    /// A deadline expired before the operation completed.
    #[error("operation timed out")]
    Timeout,

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failure of a [`ValueConverter`](crate::convert::ValueConverter).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The text does not parse as the requested type.
    #[error("invalid {expected} value: {input:?}")]
    InvalidFormat {
        /// Name of the requested type.
        expected: &'static str,
        /// The offending text.
        input: String,
    },

    /// The value has the wrong shape, e.g. a list where a scalar was expected.
    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        /// Shape the converter accepts.
        expected: &'static str,
        /// Shape that was found.
        found: &'static str,
    },
}

impl From<quick_xml::Error> for SplunkError {
    fn from(err: quick_xml::Error) -> Self {
        SplunkError::Decode(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SplunkError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        SplunkError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for SplunkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SplunkError::Timeout
        } else {
            SplunkError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for SplunkError {
    fn from(err: url::ParseError) -> Self {
        SplunkError::Config(err.to_string())
    }
}

impl SplunkError {
    /// Check if this error is worth retrying by an external policy.
    ///
    /// Returns `true` for transport failures, timeouts, and the transient
    /// statuses 408, 425, 429, 502, 503 and 504.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            SplunkError::Transport(_) | SplunkError::Timeout => true,
            SplunkError::Status { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this is an access denied error (HTTP 401 or 403).
    #[inline]
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, SplunkError::Status { status, .. } if is_access_denied_status(*status))
    }
}
