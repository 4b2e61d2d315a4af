//! Issuing requests against a Splunk management port.
//!
//! The decoding layer only needs one thing from the network: "give me the
//! response for this namespace and resource name". That contract is the
//! [`Transport`] trait. [`Context`] implements it over `reqwest`.
//!
//! # Examples
//!
//! ```ignore
//! use splunk_client::{Context, DecodeOptions, EntityCollection, Namespace};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = Context::new("https://localhost:8089")?.with_session_key("...");
//!     let apps = EntityCollection::applications(Arc::new(context), Namespace::Default);
//!     apps.fetch_all().await?;
//!     for app in apps.iter() {
//!         println!("{} {}", app.name(), app.version()?);
//!     }
//!     Ok(())
//! }
//! ```

use super::config::ClientConfig;
use super::response::Response;
use crate::error::{Result, SplunkError};
use crate::types::{Namespace, ResourceName};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Source of responses for namespaced resources.
///
/// Implementations must hand back the response without reading its body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `name` within `namespace`.
    async fn get(&self, namespace: &Namespace, name: &ResourceName) -> Result<Response>;
}

/// HTTP connection settings for one Splunk server.
#[derive(Clone)]
pub struct Context {
    client: reqwest::Client,
    base_url: Url,
    config: Arc<ClientConfig>,
    session_key: Option<String>,
}

impl Context {
    /// Create a context for `base_url` (e.g. `https://localhost:8089`) with
    /// default configuration.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Create a context with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SplunkError::Config`] for an unusable base URL or proxy.
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SplunkError::Config(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .pool_max_idle_per_host(config.max_idle_connections)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(config.user_agent.clone());

        if !config.proxy_url.is_empty() {
            let proxy = reqwest::Proxy::all(&config.proxy_url)
                .map_err(|e| SplunkError::Config(format!("invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SplunkError::Config(e.to_string()))?;

        Ok(Context {
            client,
            base_url,
            config: Arc::new(config),
            session_key: None,
        })
    }

    /// Attach a session key sent as `Authorization: Splunk <key>`.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = Some(key.into());
        self
    }

    /// Build the URL of a resource. Each path part is escaped separately.
    ///
    /// ```
    /// use splunk_client::{Context, Namespace, ResourceName};
    ///
    /// let context = Context::new("https://localhost:8089").unwrap();
    /// let url = context
    ///     .resource_url(&Namespace::new("admin", "search"), &ResourceName::new(["saved", "searches", "a/b"]))
    ///     .unwrap();
    /// assert_eq!(url.as_str(), "https://localhost:8089/servicesNS/admin/search/saved/searches/a%2Fb");
    /// ```
    pub fn resource_url(&self, namespace: &Namespace, name: &ResourceName) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SplunkError::Config("base URL cannot carry a path".into()))?;
            segments.pop_if_empty();
            segments.extend(namespace.path_segments());
            segments.extend(name.parts());
        }
        Ok(url)
    }

    /// Server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, url: Url) -> Result<Response> {
        if self.config.enable_logging {
            tracing::debug!("GET {}", url);
        }

        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.session_key {
            request = request.header(http::header::AUTHORIZATION, format!("Splunk {}", key));
        }

        let response = request.send().await?;

        if self.config.enable_logging {
            tracing::debug!("GET {} -> {}", url, response.status());
        }

        Ok(Response::from_reqwest(response))
    }
}

#[async_trait]
impl Transport for Context {
    async fn get(&self, namespace: &Namespace, name: &ResourceName) -> Result<Response> {
        let url = self.resource_url(namespace, name)?;
        self.send(url).await
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .field("session_key", &self.session_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
