//! Field specifications
//!
//! A [`FieldSpec`] describes one configuration value: its kind, an optional
//! typed default and an optional `minLength` constraint. Resolving a field
//! runs defaulting, then coercion, then constraint validation.

use crate::error::FieldError;
use crate::schema::kind::{Boolean, Enum, Kind, Measured, Number, Optional, Secret, Text};
use crate::schema::raw::RawValue;

/// Declarative description of one configuration value
pub struct FieldSpec<K: Kind> {
    name: &'static str,
    kind: K,
    default: Option<K::Output>,
    min_length: Option<MinLength<K::Output>>,
}

struct MinLength<T> {
    min: usize,
    measure: fn(&T) -> Option<usize>,
}

impl<K: Kind> FieldSpec<K> {
    pub fn new(name: &'static str, kind: K) -> Self {
        Self {
            name,
            kind,
            default: None,
            min_length: None,
        }
    }

    /// Typed value substituted when the raw field is absent.
    /// Defaults are trusted and skip coercion and validation.
    pub fn default(mut self, value: impl Into<K::Output>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Absent with no default and no absent marker is an error
    pub fn is_required(&self) -> bool {
        self.default.is_none() && self.kind.absent().is_none()
    }

    /// Resolve the field from its raw value, reporting failures at `path`
    pub fn resolve(&self, raw: Option<&RawValue>, path: &str) -> Result<K::Output, FieldError> {
        let Some(raw) = raw else {
            return self
                .default
                .clone()
                .or_else(|| self.kind.absent())
                .ok_or_else(|| FieldError::missing(path));
        };

        let value = self.kind.coerce(raw, path)?;
        self.check(&value, path)?;
        Ok(value)
    }

    fn check(&self, value: &K::Output, path: &str) -> Result<(), FieldError> {
        if let Some(constraint) = &self.min_length {
            if let Some(actual) = (constraint.measure)(value) {
                if actual < constraint.min {
                    return Err(FieldError::invalid_length(path, constraint.min, actual));
                }
            }
        }
        Ok(())
    }
}

impl<K: Kind> FieldSpec<K>
where
    K::Output: Measured,
{
    /// Require at least `min` characters when a value is present
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(MinLength {
            min,
            measure: <K::Output as Measured>::char_len,
        });
        self
    }
}

pub fn string(name: &'static str) -> FieldSpec<Text> {
    FieldSpec::new(name, Text)
}

pub fn optional_string(name: &'static str) -> FieldSpec<Optional<Text>> {
    FieldSpec::new(name, Optional(Text))
}

pub fn secret(name: &'static str) -> FieldSpec<Secret> {
    FieldSpec::new(name, Secret)
}

pub fn optional_secret(name: &'static str) -> FieldSpec<Optional<Secret>> {
    FieldSpec::new(name, Optional(Secret))
}

pub fn number(name: &'static str) -> FieldSpec<Number> {
    FieldSpec::new(name, Number)
}

pub fn boolean(name: &'static str) -> FieldSpec<Boolean> {
    FieldSpec::new(name, Boolean)
}

pub fn one_of<E: Clone + 'static>(name: &'static str, kind: Enum<E>) -> FieldSpec<Enum<E>> {
    FieldSpec::new(name, kind)
}
