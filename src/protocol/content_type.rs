//! Content-Type parsing and character encoding resolution.
//!
//! # Examples
//!
//! ```
//! use splunk_client::protocol::{charset_from_content_type, resolve_encoding};
//!
//! assert_eq!(
//!     charset_from_content_type("text/xml; charset=\"ISO-8859-9\""),
//!     Some("ISO-8859-9".to_string())
//! );
//! assert_eq!(charset_from_content_type("text/xml"), None);
//!
//! let encoding = resolve_encoding("iso-8859-9").unwrap();
//! assert_eq!(encoding.name(), "windows-1254");
//! ```

use crate::error::{Result, SplunkError};
use encoding_rs::Encoding;

/// Extract the `charset` parameter of a Content-Type header value.
///
/// Parameter names are matched case-insensitively and surrounding quotes are
/// removed. Returns `None` when the parameter is absent or empty.
pub fn charset_from_content_type(value: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Look up an encoding by its WHATWG label.
///
/// # Errors
///
/// Returns [`SplunkError::InvalidEncoding`] for unknown labels.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| SplunkError::InvalidEncoding(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_case_insensitive() {
        assert_eq!(
            charset_from_content_type("text/xml; CharSet=utf-8"),
            Some("utf-8".into())
        );
    }

    #[test]
    fn test_charset_among_other_params() {
        assert_eq!(
            charset_from_content_type("text/xml; q=1; charset=windows-1252"),
            Some("windows-1252".into())
        );
    }

    #[test]
    fn test_charset_empty() {
        assert_eq!(charset_from_content_type("text/xml; charset="), None);
    }

    #[test]
    fn test_resolve_unknown_label() {
        assert!(matches!(
            resolve_encoding("no-such-charset"),
            Err(SplunkError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_resolve_utf8() {
        assert_eq!(resolve_encoding("UTF-8").unwrap(), encoding_rs::UTF_8);
    }
}
