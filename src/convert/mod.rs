//! Typed access to untyped field values.
//!
//! A [`ValueConverter`] maps one raw [`Value`] to one target type. Converters
//! are chosen by the caller for each field; decoders never convert eagerly.
//!
//! # Strict and Lenient Converters
//!
//! Strict converters fail with a [`ConversionError`] when the value does not
//! parse. A lenient converter documents the fallback it uses instead:
//!
//! | Converter | Target | Mode | Default |
//! |-----------|--------|------|---------|
//! | [`StringConverter`] | `String` | lenient: any value renders as text, null is `""` | `""` |
//! | [`BoolConverter`] | `bool` | strict | `false` |
//! | [`ParseConverter<T>`] | any `FromStr` | strict | `T::default()` |
//! | [`VersionConverter`] | [`Version`](crate::Version) | strict | `0.0` |
//! | [`DateTimeConverter`] | `DateTime<FixedOffset>` | strict | Unix epoch |
//! | [`DurationConverter`] | `Duration` | strict | zero |
//! | [`ListConverter<C>`] | `Vec<T>` | as strict as `C` | empty |
//! | [`OrDefault<C>`] | `T` | lenient: failure yields `C`'s default | `C`'s default |
//! | [`AclConverter`] | [`Acl`](crate::resource::Acl) | strict | empty ACL |
//!
//! The default value is what field accessors return when a field is **absent**.
//! A present field that fails to convert is an error unless the converter
//! itself is lenient.
//!
//! # Examples
//!
//! ```
//! use splunk_client::convert::{OrDefault, ParseConverter, StringConverter, ValueConverter, VersionConverter};
//! use splunk_client::Value;
//!
//! assert_eq!(StringConverter.convert(&Value::Null).unwrap(), "");
//! assert!(VersionConverter.convert(&Value::from("not-a-version")).is_err());
//!
//! let port = OrDefault(ParseConverter::<u16>::new());
//! assert_eq!(port.convert(&Value::from("8089")).unwrap(), 8089);
//! assert_eq!(port.convert(&Value::from("n/a")).unwrap(), 0);
//! ```

mod scalar;

pub use scalar::{
    BoolConverter, DateTimeConverter, DurationConverter, ParseConverter, StringConverter,
    VersionConverter,
};
pub use crate::resource::AclConverter;

use crate::error::ConversionError;
use crate::types::Value;

/// Conversion of a raw value to `T`.
///
/// Implementations must be deterministic and free of side effects: the same
/// input always yields the same value or the same error.
pub trait ValueConverter<T> {
    /// Convert a present value.
    fn convert(&self, raw: &Value) -> Result<T, ConversionError>;

    /// Value used by accessors when the field is absent.
    fn default_value(&self) -> T;
}

impl<T, C: ValueConverter<T> + ?Sized> ValueConverter<T> for &C {
    fn convert(&self, raw: &Value) -> Result<T, ConversionError> {
        (**self).convert(raw)
    }

    fn default_value(&self) -> T {
        (**self).default_value()
    }
}

/// Resolve a possibly absent field: absent yields the converter's default,
/// present is converted.
pub fn convert_field<T, C>(raw: Option<&Value>, converter: &C) -> Result<T, ConversionError>
where
    C: ValueConverter<T> + ?Sized,
{
    match raw {
        Some(value) => converter.convert(value),
        None => Ok(converter.default_value()),
    }
}

/// Converts every item of a list with `C`.
///
/// A scalar converts to a one-element list and null to an empty list.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListConverter<C>(pub C);

impl<T, C: ValueConverter<T>> ValueConverter<Vec<T>> for ListConverter<C> {
    fn convert(&self, raw: &Value) -> Result<Vec<T>, ConversionError> {
        match raw {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.iter().map(|item| self.0.convert(item)).collect(),
            Value::Text(_) => Ok(vec![self.0.convert(raw)?]),
            Value::Dict(_) => Err(ConversionError::UnexpectedShape {
                expected: "list",
                found: raw.kind(),
            }),
        }
    }

    fn default_value(&self) -> Vec<T> {
        Vec::new()
    }
}

/// Lenient wrapper: when `C` fails, yields `C`'s default instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrDefault<C>(pub C);

impl<T, C: ValueConverter<T>> ValueConverter<T> for OrDefault<C> {
    fn convert(&self, raw: &Value) -> Result<T, ConversionError> {
        Ok(self.0.convert(raw).unwrap_or_else(|_| self.0.default_value()))
    }

    fn default_value(&self) -> T {
        self.0.default_value()
    }
}

/// Extract the text of a scalar value for strict converters.
pub(crate) fn scalar_text<'a>(raw: &'a Value, expected: &'static str) -> Result<&'a str, ConversionError> {
    match raw {
        Value::Text(text) => Ok(text.trim()),
        other => Err(ConversionError::UnexpectedShape {
            expected,
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fields;

    #[test]
    fn test_convert_field_absent_uses_default() {
        assert_eq!(convert_field(None, &StringConverter).unwrap(), "");
        assert!(!convert_field(None, &BoolConverter).unwrap());
    }

    #[test]
    fn test_convert_field_present_null_is_strict() {
        assert!(convert_field(Some(&Value::Null), &BoolConverter).is_err());
        assert_eq!(convert_field(Some(&Value::Null), &StringConverter).unwrap(), "");
    }

    #[test]
    fn test_list_converter_shapes() {
        let list = ListConverter(ParseConverter::<i64>::new());
        assert_eq!(list.convert(&Value::Null).unwrap(), Vec::<i64>::new());
        assert_eq!(list.convert(&Value::from("7")).unwrap(), vec![7]);
        assert_eq!(
            list.convert(&Value::List(vec!["1".into(), "2".into()])).unwrap(),
            vec![1, 2]
        );
        assert!(list.convert(&Value::Dict(Fields::new())).is_err());
    }

    #[test]
    fn test_list_converter_fails_on_bad_item() {
        let list = ListConverter(ParseConverter::<i64>::new());
        let err = list
            .convert(&Value::List(vec!["1".into(), "x".into()]))
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidFormat { .. }));
    }

    #[test]
    fn test_or_default() {
        let lenient = OrDefault(VersionConverter);
        assert_eq!(
            lenient.convert(&Value::from("garbage")).unwrap(),
            crate::Version::default()
        );
        assert_eq!(
            lenient.convert(&Value::from("6.2")).unwrap(),
            crate::Version::new(6, 2)
        );
    }

    #[test]
    fn test_converter_by_reference() {
        let converter = &StringConverter;
        assert_eq!(converter.convert(&Value::from("x")).unwrap(), "x");
    }
}
