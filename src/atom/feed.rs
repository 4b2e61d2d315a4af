use super::decode;
use crate::client::{DecodeOptions, Response};
use crate::error::Result;
use crate::types::{Message, Value, Version};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

/// OpenSearch paging counters of a feed. Absent counters are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Entities matching the request on the server.
    pub total_results: u64,
    /// Page size the server used.
    pub items_per_page: u64,
    /// Offset of the first entry in this page.
    pub start_index: u64,
}

/// The `<generator>` element: which server build produced the document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Generator {
    /// Server version; field interpretation may depend on it.
    pub version: Option<Version>,
    /// Build identifier.
    pub build: Option<String>,
}

/// A decoded Atom feed. Immutable once parsed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AtomFeed {
    /// Feed URL.
    pub id: String,
    /// Feed title, usually the collection name.
    pub title: String,
    /// Name of the feed author.
    pub author: Option<String>,
    /// Time the feed was generated.
    pub updated: Option<DateTime<FixedOffset>>,
    /// Server build that produced the feed.
    pub generator: Option<Generator>,
    /// Link relations, `rel` to `href`.
    pub links: BTreeMap<String, String>,
    /// OpenSearch paging counters.
    pub pagination: Pagination,
    /// Server messages attached to the feed.
    pub messages: Vec<Message>,
    /// Entries in document order.
    pub entries: Vec<AtomEntry>,
}

/// One entity of a feed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AtomEntry {
    /// Absolute URL identifying the entity.
    pub id: String,
    /// Entity name.
    pub title: String,
    /// Owner of the entity.
    pub author: Option<String>,
    /// Creation time.
    pub published: Option<DateTime<FixedOffset>>,
    /// Last modification time.
    pub updated: Option<DateTime<FixedOffset>>,
    /// Link relations, `rel` to `href`.
    pub links: BTreeMap<String, String>,
    /// Entity fields, usually a [`Value::Dict`].
    pub content: Value,
}

impl AtomFeed {
    /// Decode a feed document.
    ///
    /// A document whose root is a single `<entry>` decodes to a one-entry
    /// feed.
    pub fn parse(text: &str) -> Result<Self> {
        decode::parse_feed(text)
    }

    /// Check the status of `response`, decode its body and release it.
    ///
    /// The body is read to the end as text before the XML is parsed, so the
    /// whole document is held in memory once; the feed is materialized in
    /// full anyway. The response is consumed whether decoding succeeds or
    /// fails.
    pub async fn read(response: Response, options: &DecodeOptions) -> Result<Self> {
        let text = response.into_text(options).await?;
        let feed = Self::parse(&text)?;
        tracing::debug!(
            "decoded feed {:?}: {} entries, total {}",
            feed.title,
            feed.entries.len(),
            feed.pagination.total_results
        );
        Ok(feed)
    }

    /// Version of the server that generated the feed, if it said.
    pub fn generator_version(&self) -> Option<Version> {
        self.generator.as_ref().and_then(|g| g.version)
    }
}

impl AtomEntry {
    /// Decode a document whose root is `<entry>`.
    pub fn parse(text: &str) -> Result<Self> {
        decode::parse_entry(text)
    }

    /// Look up a top-level content field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.content.get(name)
    }
}
