//! Access control lists (`eai:acl`).

use crate::convert::{convert_field, BoolConverter, ListConverter, StringConverter, ValueConverter};
use crate::error::ConversionError;
use crate::types::Value;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Visibility level of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sharing {
    /// Private to its owner.
    #[default]
    User,
    /// Shared within its app.
    App,
    /// Shared with every app.
    Global,
    /// Built into the server.
    System,
}

impl FromStr for Sharing {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Sharing::User),
            "app" => Ok(Sharing::App),
            "global" => Ok(Sharing::Global),
            "system" => Ok(Sharing::System),
            _ => Err(ConversionError::InvalidFormat {
                expected: "sharing",
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Sharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sharing::User => "user",
            Sharing::App => "app",
            Sharing::Global => "global",
            Sharing::System => "system",
        })
    }
}

/// Roles allowed to read and write an entity. `*` means every role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Permissions {
    /// Roles with read access.
    pub read: Vec<String>,
    /// Roles with write access.
    pub write: Vec<String>,
}

/// Ownership and permissions of an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Acl {
    /// App the entity belongs to.
    pub app: String,
    /// Owning user.
    pub owner: String,
    /// Visibility level.
    pub sharing: Sharing,
    /// Whether the current user may edit the entity.
    pub can_write: bool,
    /// Whether the ACL itself may be changed.
    pub modifiable: bool,
    /// Whether the entity may be deleted.
    pub removable: bool,
    /// Role permissions.
    pub perms: Permissions,
}

/// Strict converter from an `eai:acl` dictionary to [`Acl`].
///
/// Absent keys take their defaults; present keys must convert.
#[derive(Clone, Copy, Debug, Default)]
pub struct AclConverter;

impl ValueConverter<Acl> for AclConverter {
    fn convert(&self, raw: &Value) -> Result<Acl, ConversionError> {
        let dict = raw.as_dict().ok_or(ConversionError::UnexpectedShape {
            expected: "acl",
            found: raw.kind(),
        })?;

        let roles = ListConverter(StringConverter);
        let perms = match dict.get("perms") {
            Some(Value::Null) | None => Permissions::default(),
            Some(Value::Dict(perms)) => Permissions {
                read: convert_field(perms.get("read"), &roles)?,
                write: convert_field(perms.get("write"), &roles)?,
            },
            Some(other) => {
                return Err(ConversionError::UnexpectedShape {
                    expected: "perms",
                    found: other.kind(),
                })
            }
        };

        let sharing = match dict.get("sharing") {
            Some(value) => StringConverter.convert(value)?.parse()?,
            None => Sharing::default(),
        };

        Ok(Acl {
            app: convert_field(dict.get("app"), &StringConverter)?,
            owner: convert_field(dict.get("owner"), &StringConverter)?,
            sharing,
            can_write: convert_field(dict.get("can_write"), &BoolConverter)?,
            modifiable: convert_field(dict.get("modifiable"), &BoolConverter)?,
            removable: convert_field(dict.get("removable"), &BoolConverter)?,
            perms,
        })
    }

    fn default_value(&self) -> Acl {
        Acl::default()
    }
}
