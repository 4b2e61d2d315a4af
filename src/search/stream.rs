use super::parser::{ResultsParser, Unit};
use super::result::SearchResult;
use crate::client::{DecodeOptions, Response, TextDecoder};
use crate::error::{Result, SplunkError};
use crate::types::Message;
use futures::stream::{self, Stream};
use std::fmt;
use tokio::time::Instant;

/// Lifecycle of a [`SearchResultStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Header read, no row produced yet.
    Open,
    /// The last `advance` produced a row.
    RowReady,
    /// All rows were produced; the response is released.
    Exhausted,
    /// A decode or transport fault ended the stream; the response is released.
    Faulted,
    /// Closed by the caller; the response is released.
    Closed,
}

/// Forward-only reader of search result rows.
///
/// The stream owns its [`Response`] and releases it exactly once: on
/// exhaustion, on a fault, on [`close`](Self::close), on an expired deadline,
/// or when dropped, whichever comes first.
///
/// # State Machine
///
/// ```text
///              advance → row
///            ┌──────────────┐
///            ▼              │
/// create → Open ──────▶ RowReady ──▶ Exhausted
///            │              │
///            └──────┬───────┘
///                   ├── malformed data ──▶ Faulted
///                   └── close() ────────▶ Closed   (from any state)
/// ```
///
/// # Examples
///
/// ```
/// use splunk_client::client::{DecodeOptions, Response};
/// use splunk_client::search::SearchResultStream;
///
/// # tokio_test::block_on(async {
/// let response = Response::from_bytes(
///     200,
///     "<results preview='0'><result offset='0'><field k='count'><value><text>3</text></value></field></result></results>",
/// );
/// let mut results = SearchResultStream::create(response, &DecodeOptions::default()).await.unwrap();
///
/// let row = results.advance().await.unwrap().unwrap();
/// assert_eq!(row.get("count").unwrap().as_text(), Some("3"));
/// assert!(results.advance().await.unwrap().is_none());
/// # });
/// ```
pub struct SearchResultStream {
    text: Option<TextDecoder>,
    response: Option<Response>,
    parser: ResultsParser,
    state: StreamState,
    fault: Option<String>,
    is_final: bool,
    field_order: Vec<String>,
    messages: Vec<Message>,
}

impl SearchResultStream {
    /// Open a stream over `response`.
    ///
    /// Checks the status, then reads until the `<results>` header.
    ///
    /// # Errors
    ///
    /// - [`SplunkError::Status`] if the status is not expected
    /// - [`SplunkError::Format`] if the body does not start with `<results>`
    ///
    /// The response is released on every error.
    pub async fn create(mut response: Response, options: &DecodeOptions) -> Result<Self> {
        response.ensure_status(&options.expected_status).await?;
        let text = response.open_text(options)?;
        tracing::debug!("opening search results as {}", text.encoding().name());

        let mut results = SearchResultStream {
            text: Some(text),
            response: Some(response),
            parser: ResultsParser::new(),
            state: StreamState::Open,
            fault: None,
            is_final: false,
            field_order: Vec::new(),
            messages: Vec::new(),
        };

        if let Err(err) = results.read_header().await {
            results.release();
            return Err(err);
        }
        Ok(results)
    }

    async fn read_header(&mut self) -> Result<()> {
        loop {
            if let Some(unit) = self.parser.next_unit()? {
                match unit {
                    Unit::Header { preview } => {
                        self.is_final = !preview;
                        return Ok(());
                    }
                    _ => {
                        return Err(SplunkError::Format(
                            "results content before the <results> header".into(),
                        ))
                    }
                }
            }
            if !self.pull().await? {
                self.parser.finish()?;
                return Err(SplunkError::Format("body has no <results> header".into()));
            }
        }
    }

    /// Read the next chunk of text into the parser. `false` at end of body.
    async fn pull(&mut self) -> Result<bool> {
        let text = self.text.as_mut().ok_or(SplunkError::StreamClosed)?;
        match text.next_chunk().await? {
            Some(chunk) => {
                self.parser.push(&chunk);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Produce the next row.
    ///
    /// Returns `Ok(None)` once the rows are exhausted, and on every later
    /// call.
    ///
    /// # Errors
    ///
    /// A malformed row or a transport failure faults the stream: this call and
    /// every later one fail. After [`close`](Self::close) every call fails with
    /// [`SplunkError::StreamClosed`].
    pub async fn advance(&mut self) -> Result<Option<SearchResult>> {
        match self.state {
            StreamState::Closed => return Err(SplunkError::StreamClosed),
            StreamState::Faulted => {
                return Err(SplunkError::Decode(format!(
                    "search result stream failed earlier: {}",
                    self.fault.as_deref().unwrap_or("unknown fault")
                )))
            }
            StreamState::Exhausted => return Ok(None),
            StreamState::Open | StreamState::RowReady => {}
        }

        match self.next_row().await {
            Ok(Some(row)) => {
                self.state = StreamState::RowReady;
                tracing::trace!("row {:?} with {} fields", row.offset(), row.len());
                Ok(Some(row))
            }
            Ok(None) => {
                tracing::debug!("search results exhausted");
                self.state = StreamState::Exhausted;
                self.release();
                Ok(None)
            }
            Err(err) => {
                tracing::debug!("search results faulted: {}", err);
                self.state = StreamState::Faulted;
                self.fault = Some(err.to_string());
                self.release();
                Err(err)
            }
        }
    }

    async fn next_row(&mut self) -> Result<Option<SearchResult>> {
        loop {
            while let Some(unit) = self.parser.next_unit()? {
                match unit {
                    Unit::Header { preview } => {
                        self.is_final = !preview;
                        self.field_order.clear();
                        self.messages.clear();
                    }
                    Unit::Meta { field_order } => self.field_order = field_order,
                    Unit::Messages(messages) => self.messages.extend(messages),
                    Unit::Row(row) => return Ok(Some(row)),
                }
            }
            if !self.pull().await? {
                self.parser.finish()?;
                return Ok(None);
            }
        }
    }

    /// Like [`advance`](Self::advance), but gives up at `deadline`.
    ///
    /// On expiry the stream is closed, releasing the response, and the call
    /// fails with [`SplunkError::Timeout`].
    pub async fn advance_with_deadline(&mut self, deadline: Instant) -> Result<Option<SearchResult>> {
        match tokio::time::timeout_at(deadline, self.advance()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("search results deadline expired");
                self.close();
                Err(SplunkError::Timeout)
            }
        }
    }

    /// Release the response. Safe to call any number of times, in any state.
    pub fn close(&mut self) {
        if self.state != StreamState::Closed {
            self.release();
            self.state = StreamState::Closed;
        }
    }

    /// Same as [`close`](Self::close).
    pub fn dispose(&mut self) {
        self.close();
    }

    fn release(&mut self) {
        self.text = None;
        if let Some(mut response) = self.response.take() {
            response.dispose();
        }
    }

    /// Current state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Field order announced by the `<meta>` block of the current
    /// `<results>` document, empty until one was read.
    pub fn field_order(&self) -> &[String] {
        &self.field_order
    }

    /// Messages the server sent with the current `<results>` document.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// `false` while the server is sending preview results.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Adapt to a [`Stream`] of rows that ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<SearchResult>> + Send {
        stream::unfold(Some(self), |results| async move {
            let mut results = results?;
            match results.advance().await {
                Ok(Some(row)) => Some((Ok(row), Some(results))),
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
    }
}

impl fmt::Debug for SearchResultStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResultStream")
            .field("state", &self.state)
            .field("is_final", &self.is_final)
            .field("buffered", &self.parser.buffered())
            .finish()
    }
}
