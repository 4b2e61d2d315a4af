//! Server messages carried alongside data.
//!
//! Both Atom feeds (`<s:messages><s:msg type="WARN">…</s:msg></s:messages>`) and
//! search results (`<messages><msg type="DEBUG">…</msg></messages>`) may carry
//! diagnostic messages from the server.

use serde::Serialize;
use std::fmt;

/// Severity of a server message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MessageKind {
    /// `DEBUG`
    Debug,
    /// `INFO`
    Info,
    /// `WARN`
    Warn,
    /// `ERROR`
    Error,
    /// `FATAL`
    Fatal,
    /// Any other type attribute, kept verbatim.
    Other(String),
}

impl MessageKind {
    /// Parse a `type` attribute, case-insensitively.
    pub fn from_attr(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "DEBUG" => MessageKind::Debug,
            "INFO" => MessageKind::Info,
            "WARN" | "WARNING" => MessageKind::Warn,
            "ERROR" => MessageKind::Error,
            "FATAL" => MessageKind::Fatal,
            _ => MessageKind::Other(value.to_string()),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Debug => f.write_str("DEBUG"),
            MessageKind::Info => f.write_str("INFO"),
            MessageKind::Warn => f.write_str("WARN"),
            MessageKind::Error => f.write_str("ERROR"),
            MessageKind::Fatal => f.write_str("FATAL"),
            MessageKind::Other(other) => f.write_str(other),
        }
    }
}

/// A single server message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Severity.
    pub kind: MessageKind,
    /// Message text.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_attr() {
        assert_eq!(MessageKind::from_attr("warn"), MessageKind::Warn);
        assert_eq!(MessageKind::from_attr("ERROR"), MessageKind::Error);
        assert_eq!(
            MessageKind::from_attr("notice"),
            MessageKind::Other("notice".into())
        );
    }
}
