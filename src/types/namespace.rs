//! Addressing of REST resources.
//!
//! A resource is addressed by a [`Namespace`] and a [`ResourceName`]:
//!
//! | Namespace | Path prefix |
//! |-----------|-------------|
//! | `Namespace::Default` | `/services/` |
//! | `Namespace::new("admin", "search")` | `/servicesNS/admin/search/` |
//! | `Namespace::any()` | `/servicesNS/-/-/` |
//!
//! The resource name follows the prefix, e.g. `apps/local/search`.

use crate::error::{Result, SplunkError};
use std::fmt;
use url::Url;

/// The user/app context a resource lives in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// The server's default namespace (`/services`).
    #[default]
    Default,
    /// A specific user and app (`/servicesNS/{user}/{app}`).
    Specific {
        /// Owning user, `-` for any, `nobody` for shared.
        user: String,
        /// Owning app, `-` for any.
        app: String,
    },
}

impl Namespace {
    /// Wildcard used by the server for "any user" and "any app".
    pub const WILDCARD: &'static str = "-";

    /// Create a user/app namespace.
    pub fn new(user: impl Into<String>, app: impl Into<String>) -> Self {
        Namespace::Specific {
            user: user.into(),
            app: app.into(),
        }
    }

    /// The namespace matching every user and app.
    pub fn any() -> Self {
        Self::new(Self::WILDCARD, Self::WILDCARD)
    }

    /// Path segments of the namespace prefix.
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            Namespace::Default => vec!["services"],
            Namespace::Specific { user, app } => vec!["servicesNS", user, app],
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.path_segments() {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Path of a resource within a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceName {
    parts: Vec<String>,
}

impl ResourceName {
    /// Create a name from its path parts.
    pub fn new<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        ResourceName {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// The installed applications collection, `apps/local`.
    pub fn applications() -> Self {
        Self::new(["apps", "local"])
    }

    /// Derive a sub-resource, e.g. `apps/local` → `apps/local/_reload`.
    pub fn child(&self, part: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(part.into());
        ResourceName { parts }
    }

    /// Path parts, unescaped.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Last path part, usually the entity's name.
    pub fn title(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("/"))
    }
}

/// Recover the namespace and resource name from an Atom entry id.
///
/// Entry ids are absolute URLs such as
/// `https://localhost:8089/servicesNS/nobody/system/apps/local/search`; a bare
/// path starting with `/` is accepted too. Segments are percent-decoded.
///
/// ```
/// use splunk_client::types::{identity_from_id, Namespace};
///
/// let (ns, name) = identity_from_id(
///     "https://localhost:8089/servicesNS/nobody/system/apps/local/my%20app",
/// ).unwrap();
/// assert_eq!(ns, Namespace::new("nobody", "system"));
/// assert_eq!(name.to_string(), "apps/local/my app");
/// ```
pub fn identity_from_id(id: &str) -> Result<(Namespace, ResourceName)> {
    let invalid = || SplunkError::InvalidResource(id.to_string());

    let url = match Url::parse(id) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) if id.starts_with('/') => {
            Url::parse("http://localhost")?.join(id).map_err(|_| invalid())?
        }
        Err(_) => return Err(invalid()),
    };

    let segments = url
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .map_err(|_| invalid())
        })
        .collect::<Result<Vec<_>>>()?;

    let (namespace, rest) = match segments.as_slice() {
        [services, rest @ ..] if services == "services" => (Namespace::Default, rest),
        [services, user, app, rest @ ..] if services == "servicesNS" => {
            (Namespace::new(user.clone(), app.clone()), rest)
        }
        _ => return Err(invalid()),
    };

    if rest.is_empty() {
        return Err(invalid());
    }

    Ok((namespace, ResourceName::new(rest.iter().cloned())))
}
