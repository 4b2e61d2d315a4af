//! Atom feed decoding.
//!
//! Splunk answers entity reads with Atom documents extended by `s:dict`,
//! `s:list` and `s:key` elements for structured field values:
//!
//! ```text
//! <feed>
//!   <title>localapps</title>
//!   <updated>2014-03-28T15:20:23-07:00</updated>
//!   <generator build="182037" version="6.1.1"/>
//!   <opensearch:totalResults>1</opensearch:totalResults>
//!   <entry>
//!     <title>search</title>
//!     <id>https://localhost:8089/servicesNS/nobody/system/apps/local/search</id>
//!     <content type="text/xml">
//!       <s:dict>
//!         <s:key name="label">Search &amp; Reporting</s:key>
//!         <s:key name="eai:acl"><s:dict>...</s:dict></s:key>
//!       </s:dict>
//!     </content>
//!   </entry>
//! </feed>
//! ```
//!
//! # Decoding Rules
//!
//! | Wire shape | Decoded as |
//! |------------|------------|
//! | `<s:key name="x">text</s:key>` | `Value::Text` |
//! | `<s:key name="x"/>` or empty key | `Value::Null` |
//! | `<s:key name="x"><s:list>…</s:list></s:key>` | `Value::List` |
//! | `<s:key name="x"><s:dict>…</s:dict></s:key>` | `Value::Dict` |
//! | unknown element | skipped |
//!
//! Any malformed markup, bad timestamp, bad pagination number or bad generator
//! version fails the whole document with [`SplunkError::Decode`]; no partial
//! feed is ever returned.
//!
//! # Examples
//!
//! ```
//! use splunk_client::atom::AtomFeed;
//!
//! let feed = AtomFeed::parse(r#"<feed xmlns:s="http://dev.splunk.com/ns/rest">
//!   <opensearch:totalResults>1</opensearch:totalResults>
//!   <entry>
//!     <title>search</title>
//!     <content><s:dict><s:key name="version">6.1.1</s:key></s:dict></content>
//!   </entry>
//! </feed>"#).unwrap();
//!
//! assert_eq!(feed.pagination.total_results, 1);
//! assert_eq!(feed.entries[0].content.get("version").unwrap().as_text(), Some("6.1.1"));
//! ```
//!
//! [`SplunkError::Decode`]: crate::SplunkError::Decode

mod decode;
mod feed;

pub use feed::{AtomEntry, AtomFeed, Generator, Pagination};
