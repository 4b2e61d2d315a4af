//! Configuration for the REST client and for individual decode operations.
//!
//! Two kinds of settings exist:
//!
//! - [`ClientConfig`] is fixed when a [`Context`](super::Context) is built and
//!   controls the HTTP client (timeouts, proxy, TLS, logging).
//! - [`DecodeOptions`] is passed to every decode call and controls how one
//!   response body is interpreted (character encoding, accepted statuses).
//!   Nothing about decoding is process-wide state.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `request_timeout_ms` | 30000 | Whole-request timeout |
//! | `connect_timeout_ms` | 10000 | Connection establishment timeout |
//! | `max_idle_connections` | 16 | Idle pooled connections per host |
//! | `proxy_url` | empty | Proxy for all requests |
//! | `accept_invalid_certs` | false | Trust self-signed server certificates |
//! | `enable_logging` | false | Log each request and status via `tracing` |
//! | `user_agent` | `splunk-client-rs/<version>` | User-Agent header |
//!
//! # Examples
//!
//! ```
//! use splunk_client::client::{ClientConfig, DecodeOptions};
//!
//! let config = ClientConfig {
//!     accept_invalid_certs: true,
//!     ..Default::default()
//! };
//! assert_eq!(config.request_timeout_ms, 30000);
//!
//! let options = DecodeOptions::new()
//!     .with_encoding_label("ISO-8859-9")
//!     .unwrap()
//!     .expect_status([200, 204]);
//! assert_eq!(options.expected_status, vec![200, 204]);
//! ```

use crate::error::Result;
use crate::protocol::{self, status};
use encoding_rs::Encoding;
use serde::Deserialize;

/// Configuration for the HTTP side of a [`Context`](super::Context).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Maximum idle connections kept per host.
    pub max_idle_connections: usize,

    /// Proxy URL (optional).
    ///
    /// If set, requests will be routed through this proxy.
    pub proxy_url: String,

    /// Accept TLS certificates that do not validate.
    ///
    /// Splunk installs with a self-signed certificate by default.
    pub accept_invalid_certs: bool,

    /// Enable request logging.
    ///
    /// When enabled, logs request URLs and response statuses using `tracing`.
    pub enable_logging: bool,

    /// Value of the User-Agent header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 30000,
            connect_timeout_ms: 10000,
            max_idle_connections: 16,
            proxy_url: String::new(),
            accept_invalid_certs: false,
            enable_logging: false,
            user_agent: concat!("splunk-client-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Settings for one decode operation.
///
/// The encoding chosen here wins over anything set on the response or declared
/// by the server, and applies to the whole body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Character encoding override for this decode.
    pub encoding: Option<&'static Encoding>,
    /// Statuses accepted as data; anything else fails before parsing.
    pub expected_status: Vec<u16>,
}

impl DecodeOptions {
    /// Options with no encoding override that accept `200 OK` only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the body with `encoding` regardless of what the server declared.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Like [`with_encoding`](Self::with_encoding), looking the encoding up by label.
    ///
    /// # Errors
    ///
    /// Returns [`SplunkError::InvalidEncoding`](crate::SplunkError::InvalidEncoding)
    /// for unknown labels.
    pub fn with_encoding_label(self, label: &str) -> Result<Self> {
        Ok(self.with_encoding(protocol::resolve_encoding(label)?))
    }

    /// Replace the set of accepted statuses.
    pub fn expect_status(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.expected_status = statuses.into_iter().collect();
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            encoding: None,
            expected_status: vec![status::OK],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout_ms, 30000);
        assert_eq!(config.connect_timeout_ms, 10000);
        assert!(!config.accept_invalid_certs);
        assert!(config.proxy_url.is_empty());
        assert!(config.user_agent.starts_with("splunk-client-rs/"));
    }

    #[test]
    fn test_partial_override() {
        let config = ClientConfig {
            enable_logging: true,
            ..Default::default()
        };
        assert!(config.enable_logging);
        assert_eq!(config.max_idle_connections, 16);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "accept_invalid_certs": true, "request_timeout_ms": 500 }"#)
                .unwrap();
        assert!(config.accept_invalid_certs);
        assert_eq!(config.request_timeout_ms, 500);
        assert_eq!(config.connect_timeout_ms, 10000);
    }

    #[test]
    fn test_decode_options_default() {
        let options = DecodeOptions::default();
        assert_eq!(options.encoding, None);
        assert_eq!(options.expected_status, vec![200]);
    }

    #[test]
    fn test_decode_options_bad_label() {
        assert!(DecodeOptions::new().with_encoding_label("klingon").is_err());
    }
}
