//! Field kinds and raw value coercion
//!
//! Each kind turns a [`RawValue`] into the typed value its field demands, or
//! reports the failure against the field's dotted path.

use crate::error::FieldError;
use crate::schema::raw::RawValue;
use crate::util::SecretString;

/// A coercion primitive for one kind of configuration value
pub trait Kind {
    type Output: Clone;

    /// Convert a present raw value into the typed output
    fn coerce(&self, raw: &RawValue, path: &str) -> Result<Self::Output, FieldError>;

    /// Value used when the field is absent and has no default.
    /// `None` means the field is required.
    fn absent(&self) -> Option<Self::Output> {
        None
    }
}

/// Plain string, passed through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Kind for Text {
    type Output = String;

    fn coerce(&self, raw: &RawValue, _path: &str) -> Result<String, FieldError> {
        Ok(match raw {
            RawValue::Text(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// String that must never show up in logs
#[derive(Debug, Clone, Copy, Default)]
pub struct Secret;

impl Kind for Secret {
    type Output = SecretString;

    fn coerce(&self, raw: &RawValue, path: &str) -> Result<SecretString, FieldError> {
        Text.coerce(raw, path).map(SecretString::from)
    }
}

/// Exactly `"true"` or `"false"`, or a native boolean
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Kind for Boolean {
    type Output = bool;

    fn coerce(&self, raw: &RawValue, path: &str) -> Result<bool, FieldError> {
        match raw {
            RawValue::Bool(b) => Ok(*b),
            RawValue::Text(s) if s == "true" => Ok(true),
            RawValue::Text(s) if s == "false" => Ok(false),
            other => Err(FieldError::invalid_boolean(path, other.to_string())),
        }
    }
}

/// Native number or a string that parses as one
///
/// Any finite value is accepted; range and integrality are left to the
/// consumer of the field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Number;

impl Kind for Number {
    type Output = f64;

    fn coerce(&self, raw: &RawValue, path: &str) -> Result<f64, FieldError> {
        let parsed = match raw {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        parsed
            .filter(|n| n.is_finite())
            .ok_or_else(|| FieldError::invalid_number(path, raw.to_string()))
    }
}

/// One of a fixed set of names, each mapped to a typed variant
#[derive(Debug, Clone, Copy)]
pub struct Enum<E: 'static> {
    variants: &'static [(&'static str, E)],
}

impl<E: 'static> Enum<E> {
    pub const fn new(variants: &'static [(&'static str, E)]) -> Self {
        Self { variants }
    }

    /// Accepted raw spellings, in declaration order
    pub fn allowed(&self) -> Vec<&'static str> {
        self.variants.iter().map(|(name, _)| *name).collect()
    }
}

impl<E: Clone + 'static> Kind for Enum<E> {
    type Output = E;

    fn coerce(&self, raw: &RawValue, path: &str) -> Result<E, FieldError> {
        let found = match raw {
            RawValue::Text(s) => self.variants.iter().find(|(name, _)| *name == s.as_str()),
            _ => None,
        };

        match found {
            Some((_, variant)) => Ok(variant.clone()),
            None => Err(FieldError::invalid_enum(
                path,
                raw.to_string(),
                &self.allowed(),
            )),
        }
    }
}

/// Wraps another kind; absence resolves to `None` instead of an error
#[derive(Debug, Clone, Copy, Default)]
pub struct Optional<K>(pub K);

impl<K: Kind> Kind for Optional<K> {
    type Output = Option<K::Output>;

    fn coerce(&self, raw: &RawValue, path: &str) -> Result<Self::Output, FieldError> {
        self.0.coerce(raw, path).map(Some)
    }

    fn absent(&self) -> Option<Self::Output> {
        Some(None)
    }
}

/// Values with a character length, for `minLength` constraints.
/// `None` means there is nothing to measure (an absent optional).
pub trait Measured {
    fn char_len(&self) -> Option<usize>;
}

impl Measured for String {
    fn char_len(&self) -> Option<usize> {
        Some(self.chars().count())
    }
}

impl Measured for SecretString {
    fn char_len(&self) -> Option<usize> {
        Some(SecretString::char_len(self))
    }
}

impl<T: Measured> Measured for Option<T> {
    fn char_len(&self) -> Option<usize> {
        self.as_ref().and_then(Measured::char_len)
    }
}
