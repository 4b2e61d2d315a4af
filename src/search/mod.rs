//! Streaming search results.
//!
//! A search results body is one or more `<results>` documents, each holding
//! optional metadata followed by result rows:
//!
//! ```text
//! <results preview='0'>
//!   <meta><fieldOrder><field>_time</field><field>host</field></fieldOrder></meta>
//!   <messages><msg type="INFO">...</msg></messages>
//!   <result offset='0'>
//!     <field k='host'><value><text>web-01</text></value></field>
//!     <field k='_raw'><v xml:space='preserve'>GET /index 200</v></field>
//!   </result>
//!   ...
//! </results>
//! ```
//!
//! [`SearchResultStream`] decodes rows one at a time as bytes arrive, keeping
//! at most the row being assembled in memory. Each row is a [`SearchResult`]
//! with its own field set.
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | status not expected | `SplunkError::Status`, before reading the body |
//! | body does not start with `<results>` | `SplunkError::Format` from `create` |
//! | truncated or malformed row | `SplunkError::Decode`, stream faulted for good |
//! | deadline expired | `SplunkError::Timeout`, stream closed |

mod parser;
mod result;
mod stream;

pub use result::SearchResult;
pub use stream::{SearchResultStream, StreamState};
