//! A completed HTTP exchange whose body has not been read yet.
//!
//! [`Response`] owns the body stream of one exchange. Decoders take the
//! response by value, so a body can only ever have one consumer.
//!
//! # Lifecycle
//!
//! ```text
//! Unread ──open_stream()──▶ Opened
//!   │                         │
//!   └────────dispose()────────┴──▶ Disposed
//! ```
//!
//! Dropping a `Response` releases its body exactly like [`Response::dispose`].
//!
//! # Examples
//!
//! ```
//! use splunk_client::client::Response;
//!
//! # tokio_test::block_on(async {
//! let mut response = Response::from_bytes(404, "<response>not found</response>");
//! let err = response.ensure_status(&[200]).await.unwrap_err();
//! assert!(err.to_string().contains("404"));
//! assert!(response.is_disposed());
//! # });
//! ```

use super::config::DecodeOptions;
use super::text::TextDecoder;
use crate::error::{Result, SplunkError};
use crate::protocol::charset_from_content_type;
use bytes::Bytes;
use encoding_rs::Encoding;
use futures::stream::{self, Stream, StreamExt};
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use std::fmt;
use std::pin::Pin;

/// Byte stream of a response body.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Leading body bytes kept in a [`SplunkError::Status`].
const MAX_ERROR_BODY: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BodyState {
    Unread,
    Opened,
    Disposed,
}

/// One completed exchange: status, headers, and an unread body.
pub struct Response {
    status: u16,
    headers: HeaderMap,
    encoding: Option<&'static Encoding>,
    body: Option<BodyStream>,
    state: BodyState,
}

impl Response {
    /// Create a response from its parts.
    pub fn new<S>(status: u16, headers: HeaderMap, body: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Response {
            status,
            headers,
            encoding: None,
            body: Some(Box::pin(body)),
            state: BodyState::Unread,
        }
    }

    /// Create a response with no headers and an in-memory body.
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self::new(status, HeaderMap::new(), stream::once(async move { Ok(body) }))
    }

    /// Wrap a `reqwest` response without reading its body.
    pub fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(SplunkError::from));
        Self::new(status, headers, body)
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Encoding named by the `charset` of the Content-Type header.
    ///
    /// Unknown labels are treated as absent.
    pub fn declared_encoding(&self) -> Option<&'static Encoding> {
        let content_type = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let label = charset_from_content_type(content_type)?;
        let encoding = Encoding::for_label(label.as_bytes());
        if encoding.is_none() {
            tracing::debug!("ignoring unknown charset {:?} in Content-Type", label);
        }
        encoding
    }

    /// Encoding the body will be decoded with when no per-call override is given.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
            .or_else(|| self.declared_encoding())
            .unwrap_or(encoding_rs::UTF_8)
    }

    /// Override the encoding of this response.
    ///
    /// # Errors
    ///
    /// Returns [`SplunkError::EncodingLocked`] once the body has been opened.
    pub fn set_encoding(&mut self, encoding: &'static Encoding) -> Result<()> {
        if self.state != BodyState::Unread {
            return Err(SplunkError::EncodingLocked);
        }
        self.encoding = Some(encoding);
        Ok(())
    }

    /// Take the body stream. Only the first call succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SplunkError::BodyConsumed`] if the body was already opened or
    /// the response was disposed.
    pub fn open_stream(&mut self) -> Result<BodyStream> {
        match (self.state, self.body.take()) {
            (BodyState::Unread, Some(body)) => {
                self.state = BodyState::Opened;
                Ok(body)
            }
            _ => Err(SplunkError::BodyConsumed),
        }
    }

    /// Open the body as text, honoring the encoding precedence of `options`.
    pub(crate) fn open_text(&mut self, options: &DecodeOptions) -> Result<TextDecoder> {
        let encoding = options.encoding.unwrap_or_else(|| self.encoding());
        let stream = self.open_stream()?;
        Ok(TextDecoder::new(stream, encoding))
    }

    /// Fail unless the status is one of `expected`.
    ///
    /// On failure the leading part of the body is captured into
    /// [`SplunkError::Status`] and the response is released.
    pub async fn ensure_status(&mut self, expected: &[u16]) -> Result<()> {
        if expected.contains(&self.status) {
            return Ok(());
        }

        let mut snippet = Vec::new();
        if let Ok(mut body) = self.open_stream() {
            while snippet.len() < MAX_ERROR_BODY {
                match body.next().await {
                    Some(Ok(chunk)) => snippet.extend_from_slice(&chunk),
                    Some(Err(_)) | None => break,
                }
            }
        }
        snippet.truncate(MAX_ERROR_BODY);
        self.dispose();

        Err(SplunkError::Status {
            status: self.status,
            body: String::from_utf8_lossy(&snippet).into_owned(),
        })
    }

    /// Check the status against `options` and decode the whole body to text.
    pub(crate) async fn into_text(mut self, options: &DecodeOptions) -> Result<String> {
        self.ensure_status(&options.expected_status).await?;
        let text = self.open_text(options)?;
        text.read_to_string().await
    }

    /// Release the body. Safe to call any number of times.
    pub fn dispose(&mut self) {
        if self.state != BodyState::Disposed {
            self.body = None;
            self.state = BodyState::Disposed;
        }
    }

    /// True once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.state == BodyState::Disposed
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("encoding", &self.encoding().name())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn xml_response(content_type: &str, body: &'static [u8]) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        Response::new(
            200,
            headers,
            stream::once(async move { Ok(Bytes::from_static(body)) }),
        )
    }

    #[test]
    fn test_open_stream_once() {
        let mut response = Response::from_bytes(200, "body");
        assert!(response.open_stream().is_ok());
        assert!(matches!(
            response.open_stream(),
            Err(SplunkError::BodyConsumed)
        ));
    }

    #[test]
    fn test_encoding_locked_after_open() {
        let mut response = Response::from_bytes(200, "body");
        response.set_encoding(encoding_rs::WINDOWS_1252).unwrap();
        let _body = response.open_stream().unwrap();
        assert!(matches!(
            response.set_encoding(encoding_rs::UTF_8),
            Err(SplunkError::EncodingLocked)
        ));
        assert_eq!(response.encoding(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_declared_encoding() {
        let response = xml_response("text/xml; charset=ISO-8859-9", b"");
        assert_eq!(response.encoding().name(), "windows-1254");

        let response = xml_response("text/xml; charset=bogus", b"");
        assert_eq!(response.encoding(), encoding_rs::UTF_8);
    }

    #[test]
    fn test_dispose_idempotent() {
        let mut response = Response::from_bytes(200, "body");
        response.dispose();
        response.dispose();
        assert!(response.is_disposed());
        assert!(response.open_stream().is_err());
    }

    #[tokio::test]
    async fn test_ensure_status_ok() {
        let mut response = Response::from_bytes(201, "");
        tokio_test::assert_ok!(response.ensure_status(&[200, 201]).await);
        assert!(!response.is_disposed());
    }

    #[tokio::test]
    async fn test_ensure_status_captures_body() {
        let mut response = Response::from_bytes(500, "<response>boom</response>");
        match response.ensure_status(&[200]).await {
            Err(SplunkError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "<response>boom</response>");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(response.is_disposed());
    }

    #[tokio::test]
    async fn test_option_encoding_wins() {
        let response = xml_response("text/xml; charset=utf-8", b"ba\xFEka");
        let options = DecodeOptions::new().with_encoding_label("iso-8859-9").unwrap();
        assert_eq!(response.into_text(&options).await.unwrap(), "başka");
    }
}
