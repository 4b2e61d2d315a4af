use super::acl::{Acl, AclConverter};
use crate::atom::AtomEntry;
use crate::convert::{convert_field, ValueConverter};
use crate::error::Result;
use crate::types::{Value, Version};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field holding the access control list of an entity.
pub const ACL_FIELD: &str = "eai:acl";

/// Immutable projection of one entry's fields.
///
/// A snapshot is never edited; a newer read produces a new snapshot that
/// replaces the old one in its [`Resource`](super::Resource).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    id: String,
    title: String,
    author: Option<String>,
    published: Option<DateTime<FixedOffset>>,
    updated: Option<DateTime<FixedOffset>>,
    links: BTreeMap<String, String>,
    content: Value,
    generator_version: Option<Version>,
    acl: Option<Acl>,
}

impl Snapshot {
    /// Build a snapshot from a decoded entry.
    ///
    /// `generator_version` is the version of the server that produced the
    /// entry. The ACL is typed here; every other field stays raw until read
    /// with a converter.
    ///
    /// # Errors
    ///
    /// Returns [`SplunkError::Conversion`](crate::SplunkError::Conversion) if
    /// `eai:acl` is present but malformed.
    pub fn from_entry(entry: AtomEntry, generator_version: Option<Version>) -> Result<Self> {
        let acl = match entry.content.get(ACL_FIELD) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(AclConverter.convert(raw)?),
        };

        Ok(Snapshot {
            id: entry.id,
            title: entry.title,
            author: entry.author,
            published: entry.published,
            updated: entry.updated,
            links: entry.links,
            content: entry.content,
            generator_version,
            acl,
        })
    }

    /// Entry id, the entity URL.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Entity name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Owner of the entity.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Creation time.
    pub fn published(&self) -> Option<DateTime<FixedOffset>> {
        self.published
    }

    /// Last modification time.
    pub fn updated(&self) -> Option<DateTime<FixedOffset>> {
        self.updated
    }

    /// Link relations, `rel` to `href`.
    pub fn links(&self) -> &BTreeMap<String, String> {
        &self.links
    }

    /// All fields as one raw value.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Version of the server the snapshot was read from.
    pub fn generator_version(&self) -> Option<Version> {
        self.generator_version
    }

    /// Typed `eai:acl`, if the entry carried one.
    pub fn acl(&self) -> Option<&Acl> {
        self.acl.as_ref()
    }

    /// Raw value of field `name`.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.content.get(name)
    }

    /// Names of the fields present, in name order.
    pub fn field_names(&self) -> Vec<&str> {
        self.content
            .as_dict()
            .map(|fields| fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Read field `name` with `converter`.
    ///
    /// An absent field yields the converter's default. A present field that
    /// fails to convert is an error, unless the converter is lenient.
    ///
    /// # Examples
    ///
    /// ```
    /// use splunk_client::atom::AtomEntry;
    /// use splunk_client::convert::{StringConverter, VersionConverter};
    /// use splunk_client::Snapshot;
    ///
    /// let entry = AtomEntry::parse(
    ///     "<entry><content><s:dict><s:key name='version'>6.1</s:key></s:dict></content></entry>",
    /// ).unwrap();
    /// let snapshot = Snapshot::from_entry(entry, None).unwrap();
    ///
    /// assert_eq!(snapshot.get_value("label", &StringConverter).unwrap(), "");
    /// assert_eq!(snapshot.get_value("version", &VersionConverter).unwrap().to_string(), "6.1");
    /// ```
    pub fn get_value<T, C>(&self, name: &str, converter: &C) -> Result<T>
    where
        C: ValueConverter<T> + ?Sized,
    {
        Ok(convert_field(self.raw(name), converter)?)
    }
}
