//! Untyped wire values.
//!
//! Every field the server sends, whether in an Atom entry's content block or in
//! a search result row, is held as a [`Value`] until a caller asks for a typed
//! view through a [`ValueConverter`](crate::convert::ValueConverter).
//!
//! | Wire form | Value |
//! |-----------|-------|
//! | `<s:key name="k">text</s:key>` | `Value::Text` |
//! | `<s:key name="k"/>` | `Value::Null` |
//! | `<s:list><s:item>…</s:item></s:list>` | `Value::List` |
//! | `<s:dict><s:key …>…</s:key></s:dict>` | `Value::Dict` |
//! | search field with several `<value>`s | `Value::List` |

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field map of a dictionary value, ordered by field name.
pub type Fields = BTreeMap<String, Value>;

/// A raw field value as decoded from the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Present but empty.
    #[default]
    Null,
    /// Scalar text.
    Text(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Nested dictionary.
    Dict(Fields),
}

impl Value {
    /// Returns the text of a scalar value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the items of a list value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the fields of a dictionary value.
    pub fn as_dict(&self) -> Option<&Fields> {
        match self {
            Value::Dict(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up a key of a dictionary value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict().and_then(|fields| fields.get(key))
    }

    /// Walks nested dictionaries along `path`.
    ///
    /// ```
    /// use splunk_client::{Fields, Value};
    ///
    /// let mut perms = Fields::new();
    /// perms.insert("read".into(), Value::from("*"));
    /// let mut acl = Fields::new();
    /// acl.insert("perms".into(), Value::Dict(perms));
    ///
    /// let value = Value::Dict(acl);
    /// assert_eq!(value.get_path(&["perms", "read"]), Some(&Value::from("*")));
    /// assert_eq!(value.get_path(&["perms", "write"]), None);
    /// ```
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the value's shape, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }
}

/// Generic textual form: null is empty, lists are comma separated and
/// dictionaries render as `{key: value, ...}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(text) => f.write_str(text),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Dict(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Dict(fields)
    }
}
