//! Wire-level constants and header parsing for the Splunk REST API.
//!
//! # Status Codes
//!
//! | Code | Meaning for this layer |
//! |------|------------------------|
//! | `200 OK` | Body is a feed or a results payload |
//! | `201 Created` | Body is a feed describing the new entity |
//! | `204 No Content` | Search results not ready yet |
//! | `4xx`/`5xx` | Body is an error document, never decoded as data |
//!
//! # Element Names
//!
//! Atom documents mix three XML namespaces (`atom`, `s`, `opensearch`).
//! Decoders match on local names only, so the constants below carry no prefix.

pub mod content_type;

pub use content_type::{charset_from_content_type, resolve_encoding};

/// HTTP status codes the decoders care about.
pub mod status {
    /// Request succeeded.
    pub const OK: u16 = 200;
}

/// Local element and attribute names of the Atom feed format.
pub mod atom {
    /// Feed document element.
    pub const FEED: &str = "feed";
    /// Entry element.
    pub const ENTRY: &str = "entry";
    /// Entry or feed title.
    pub const TITLE: &str = "title";
    /// Entry or feed id.
    pub const ID: &str = "id";
    /// Last update timestamp.
    pub const UPDATED: &str = "updated";
    /// Publication timestamp.
    pub const PUBLISHED: &str = "published";
    /// Author container.
    pub const AUTHOR: &str = "author";
    /// Author name.
    pub const NAME: &str = "name";
    /// Link relation element.
    pub const LINK: &str = "link";
    /// Generator element carrying the server version.
    pub const GENERATOR: &str = "generator";
    /// Entry content block.
    pub const CONTENT: &str = "content";
    /// `opensearch:totalResults`
    pub const TOTAL_RESULTS: &str = "totalResults";
    /// `opensearch:itemsPerPage`
    pub const ITEMS_PER_PAGE: &str = "itemsPerPage";
    /// `opensearch:startIndex`
    pub const START_INDEX: &str = "startIndex";
    /// `s:dict`
    pub const DICT: &str = "dict";
    /// `s:key`
    pub const KEY: &str = "key";
    /// `s:list`
    pub const LIST: &str = "list";
    /// `s:item`
    pub const ITEM: &str = "item";
    /// `s:messages`
    pub const MESSAGES: &str = "messages";
    /// `s:msg`
    pub const MSG: &str = "msg";
}

/// Local element and attribute names of the search results format.
pub mod results {
    /// Results document element.
    pub const RESULTS: &str = "results";
    /// Header metadata.
    pub const META: &str = "meta";
    /// Field order list inside `meta`.
    pub const FIELD_ORDER: &str = "fieldOrder";
    /// Messages block.
    pub const MESSAGES: &str = "messages";
    /// Single message.
    pub const MSG: &str = "msg";
    /// One result row.
    pub const RESULT: &str = "result";
    /// One field of a row, or one entry of `fieldOrder`.
    pub const FIELD: &str = "field";
    /// One value of a field.
    pub const VALUE: &str = "value";
    /// Text of a value.
    pub const TEXT: &str = "text";
    /// Raw event text (`_raw`), may contain highlight markup.
    pub const RAW: &str = "v";
    /// Field name attribute.
    pub const KEY_ATTR: &str = "k";
    /// Row offset attribute.
    pub const OFFSET_ATTR: &str = "offset";
    /// Preview flag attribute on `results`.
    pub const PREVIEW_ATTR: &str = "preview";
}
