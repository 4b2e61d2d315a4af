//! Streaming byte-to-text decoding.
//!
//! A body arrives as arbitrary byte chunks; a multi-byte character may be split
//! across two of them. [`TextDecoder`] keeps an `encoding_rs` decoder across
//! chunks so every returned piece of text is complete UTF-8.
//!
//! Decoding is strict: bytes that are malformed for the selected encoding fail
//! with [`SplunkError::Decode`] instead of being replaced.

use super::response::BodyStream;
use crate::error::{Result, SplunkError};
use encoding_rs::{Decoder, DecoderResult, Encoding};
use futures::StreamExt;

/// Incremental decoder from a body stream to UTF-8 text.
pub(crate) struct TextDecoder {
    stream: BodyStream,
    decoder: Decoder,
    encoding: &'static Encoding,
    finished: bool,
}

impl TextDecoder {
    pub(crate) fn new(stream: BodyStream, encoding: &'static Encoding) -> Self {
        TextDecoder {
            stream,
            // a byte order mark, if present, overrides the selected encoding
            decoder: encoding.new_decoder(),
            encoding,
            finished: false,
        }
    }

    /// Encoding selected for this body.
    pub(crate) fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Read the next piece of text.
    ///
    /// Returns `Ok(None)` once the body is exhausted. Pieces may be empty when a
    /// chunk ended in the middle of a character.
    pub(crate) async fn next_chunk(&mut self) -> Result<Option<String>> {
        if self.finished {
            return Ok(None);
        }

        match self.stream.next().await {
            Some(Ok(bytes)) => self.decode(&bytes, false).map(Some),
            Some(Err(err)) => Err(err),
            None => {
                self.finished = true;
                let tail = self.decode(&[], true)?;
                Ok((!tail.is_empty()).then_some(tail))
            }
        }
    }

    /// Read and decode the whole remaining body.
    pub(crate) async fn read_to_string(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(chunk) = self.next_chunk().await? {
            text.push_str(&chunk);
        }
        Ok(text)
    }

    fn decode(&mut self, src: &[u8], last: bool) -> Result<String> {
        let capacity = self
            .decoder
            .max_utf8_buffer_length_without_replacement(src.len())
            .ok_or_else(|| SplunkError::Decode("body chunk is too large to decode".into()))?;
        let mut text = String::with_capacity(capacity);

        let (result, _read) = self
            .decoder
            .decode_to_string_without_replacement(src, &mut text, last);

        match result {
            DecoderResult::InputEmpty => Ok(text),
            DecoderResult::Malformed(_, _) => Err(SplunkError::Decode(format!(
                "body is not valid {}",
                self.encoding.name()
            ))),
            DecoderResult::OutputFull => Err(SplunkError::Decode(
                "decoded text exceeded its buffer".into(),
            )),
        }
    }
}
