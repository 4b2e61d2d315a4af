//! Dotted numeric versions.
//!
//! Splunk reports its own version in the Atom `generator` element and
//! applications report theirs in the `version` content field. Both use a dotted
//! form with two to four numeric components:
//!
//! ```text
//! 6.1
//! 6.1.3
//! 6.1.3.220630
//! ```
//!
//! # Examples
//!
//! ```
//! use splunk_client::Version;
//!
//! let v: Version = "6.1.3".parse().unwrap();
//! assert_eq!(v.major(), 6);
//! assert_eq!(v.build(), Some(3));
//! assert!(v > "6.1".parse().unwrap());
//! assert!("not-a-version".parse::<Version>().is_err());
//! ```

use crate::error::ConversionError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A `major.minor[.build[.revision]]` version.
///
/// Ordering compares components left to right; a missing component sorts
/// before any present one, so `6.1 < 6.1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    build: Option<u32>,
    revision: Option<u32>,
}

impl Version {
    /// Create a two-component version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Version {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    /// Set the build component.
    pub const fn with_build(mut self, build: u32) -> Self {
        self.build = Some(build);
        self
    }

    /// Set the revision component. Implies a build component of 0 if none was set.
    pub const fn with_revision(mut self, revision: u32) -> Self {
        if self.build.is_none() {
            self.build = Some(0);
        }
        self.revision = Some(revision);
        self
    }

    /// Major component.
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor component.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Build component, if present.
    pub fn build(&self) -> Option<u32> {
        self.build
    }

    /// Revision component, if present.
    pub fn revision(&self) -> Option<u32> {
        self.revision
    }
}

impl FromStr for Version {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConversionError::InvalidFormat {
            expected: "version",
            input: s.to_string(),
        };

        let mut parts = Vec::with_capacity(4);
        for part in s.trim().split('.') {
            // u32::from_str accepts a leading '+', dotted versions do not
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            parts.push(part.parse::<u32>().map_err(|_| invalid())?);
        }

        match parts.as_slice() {
            [major, minor] => Ok(Version::new(*major, *minor)),
            [major, minor, build] => Ok(Version::new(*major, *minor).with_build(*build)),
            [major, minor, build, revision] => Ok(Version::new(*major, *minor)
                .with_build(*build)
                .with_revision(*revision)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
        }
        if let Some(revision) = self.revision {
            write!(f, ".{}", revision)?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        let v: Version = "6.1.3.220630".parse().unwrap();
        assert_eq!(v.major(), 6);
        assert_eq!(v.minor(), 1);
        assert_eq!(v.build(), Some(3));
        assert_eq!(v.revision(), Some(220630));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "6", "6.", ".1", "a.b", "6.1.2.3.4", "+6.1", "6.-1", "not-a-version"] {
            assert!(input.parse::<Version>().is_err(), "{input:?} parsed");
        }
    }

    #[test]
    fn test_display_round_trips_text() {
        assert_eq!("5.0".parse::<Version>().unwrap().to_string(), "5.0");
        assert_eq!("6.2.0".parse::<Version>().unwrap().to_string(), "6.2.0");
    }

    #[test]
    fn test_ordering() {
        let a: Version = "6.1".parse().unwrap();
        let b: Version = "6.1.0".parse().unwrap();
        let c: Version = "6.10".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_with_revision_fills_build() {
        let v = Version::new(1, 2).with_revision(7);
        assert_eq!(v.to_string(), "1.2.0.7");
    }
}
