//! Built-in converters for scalar targets.

use super::{scalar_text, ValueConverter};
use crate::error::ConversionError;
use crate::types::{Value, Version};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::time::Duration;

/// Lenient text converter.
///
/// Never fails: text is returned as-is, null becomes `""`, lists and dicts use
/// the generic rendering of [`Value`]'s `Display`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringConverter;

impl ValueConverter<String> for StringConverter {
    fn convert(&self, raw: &Value) -> Result<String, ConversionError> {
        Ok(raw.to_string())
    }

    fn default_value(&self) -> String {
        String::new()
    }
}

/// Strict boolean converter.
///
/// Accepts `1`/`0`, `true`/`false`, `t`/`f`, `yes`/`no` and `on`/`off` in any
/// case.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolConverter;

impl ValueConverter<bool> for BoolConverter {
    fn convert(&self, raw: &Value) -> Result<bool, ConversionError> {
        let text = scalar_text(raw, "boolean")?;
        match text.to_ascii_lowercase().as_str() {
            "1" | "true" | "t" | "yes" | "on" => Ok(true),
            "0" | "false" | "f" | "no" | "off" => Ok(false),
            _ => Err(ConversionError::InvalidFormat {
                expected: "boolean",
                input: text.to_string(),
            }),
        }
    }

    fn default_value(&self) -> bool {
        false
    }
}

/// Strict converter for any `FromStr` type, e.g. integers and floats.
pub struct ParseConverter<T>(PhantomData<fn() -> T>);

impl<T> ParseConverter<T> {
    /// Create a converter for `T`.
    pub const fn new() -> Self {
        ParseConverter(PhantomData)
    }
}

impl<T> Default for ParseConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ParseConverter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ParseConverter<T> {}

impl<T> fmt::Debug for ParseConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParseConverter<{}>", std::any::type_name::<T>())
    }
}

impl<T: FromStr + Default> ValueConverter<T> for ParseConverter<T> {
    fn convert(&self, raw: &Value) -> Result<T, ConversionError> {
        let expected = std::any::type_name::<T>();
        let text = scalar_text(raw, expected)?;
        text.parse().map_err(|_| ConversionError::InvalidFormat {
            expected,
            input: text.to_string(),
        })
    }

    fn default_value(&self) -> T {
        T::default()
    }
}

/// Strict dotted-version converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct VersionConverter;

impl ValueConverter<Version> for VersionConverter {
    fn convert(&self, raw: &Value) -> Result<Version, ConversionError> {
        scalar_text(raw, "version")?.parse()
    }

    fn default_value(&self) -> Version {
        Version::default()
    }
}

/// Strict timestamp converter.
///
/// Accepts RFC 3339 (`2014-03-28T15:20:23-07:00`) or seconds since the Unix
/// epoch with an optional fraction (`1396045223.000`), the two forms Splunk
/// uses for times.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateTimeConverter;

impl ValueConverter<DateTime<FixedOffset>> for DateTimeConverter {
    fn convert(&self, raw: &Value) -> Result<DateTime<FixedOffset>, ConversionError> {
        let text = scalar_text(raw, "timestamp")?;
        let invalid = || ConversionError::InvalidFormat {
            expected: "timestamp",
            input: text.to_string(),
        };

        if let Ok(time) = DateTime::parse_from_rfc3339(text) {
            return Ok(time);
        }

        let seconds: f64 = text.parse().map_err(|_| invalid())?;
        if !seconds.is_finite() {
            return Err(invalid());
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round() as u32;
        Utc.timestamp_opt(whole as i64, nanos.min(999_999_999))
            .single()
            .map(|time| time.fixed_offset())
            .ok_or_else(invalid)
    }

    fn default_value(&self) -> DateTime<FixedOffset> {
        DateTime::UNIX_EPOCH.fixed_offset()
    }
}

/// Strict duration converter for non-negative seconds, fractions allowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct DurationConverter;

impl ValueConverter<Duration> for DurationConverter {
    fn convert(&self, raw: &Value) -> Result<Duration, ConversionError> {
        let text = scalar_text(raw, "duration")?;
        text.parse::<f64>()
            .ok()
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
            .ok_or_else(|| ConversionError::InvalidFormat {
                expected: "duration",
                input: text.to_string(),
            })
    }

    fn default_value(&self) -> Duration {
        Duration::ZERO
    }
}
