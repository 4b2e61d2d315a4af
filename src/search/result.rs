use crate::convert::{convert_field, ValueConverter};
use crate::error::Result;
use crate::types::{Fields, Value};
use serde::Serialize;

/// One row of search results.
///
/// Rows carry their own field set: a later row may add or omit fields
/// relative to an earlier one. A multi-valued field is a [`Value::List`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    offset: Option<u64>,
    fields: Fields,
}

impl SearchResult {
    pub(crate) fn new(offset: Option<u64>, fields: Fields) -> Self {
        SearchResult { offset, fields }
    }

    /// Position of the row in the result set, when the server sent it.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Names of the fields of this row, in name order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Raw value of field `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Read field `name` with `converter`; absent fields yield its default.
    pub fn get_value<T, C>(&self, name: &str, converter: &C) -> Result<T>
    where
        C: ValueConverter<T> + ?Sized,
    {
        Ok(convert_field(self.fields.get(name), converter)?)
    }

    /// All fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Take the fields out of the row.
    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a row without fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
