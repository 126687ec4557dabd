//! Error types for bootcfg
//!
//! Field-level failures are collected into a [`ValidationErrors`] list so the
//! boot sequence can report every violated path at once. Failures that happen
//! before validation (unreadable files, malformed input shapes) surface as
//! [`ConfigError::Load`].

use std::fmt;
use thiserror::Error;

/// Top-level configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
}

impl ConfigError {
    /// Field errors carried by this error, empty for load failures
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ConfigError::Invalid(errors) => errors.as_slice(),
            ConfigError::Load(_) => &[],
        }
    }
}

/// What went wrong with a single field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    #[error("required value is missing")]
    MissingRequiredField,

    #[error("expected \"true\" or \"false\", got {raw:?}")]
    InvalidBoolean { raw: String },

    #[error("expected a number, got {raw:?}")]
    InvalidNumber { raw: String },

    #[error("expected one of [{}], got {raw:?}", .allowed.join(", "))]
    InvalidEnum { raw: String, allowed: Vec<String> },

    #[error("must be at least {min} characters long, got {actual}")]
    InvalidLength { min: usize, actual: usize },
}

impl FieldErrorKind {
    /// Stable name of the error kind, used in structured logs
    pub fn name(&self) -> &'static str {
        match self {
            FieldErrorKind::MissingRequiredField => "MissingRequiredField",
            FieldErrorKind::InvalidBoolean { .. } => "InvalidBoolean",
            FieldErrorKind::InvalidNumber { .. } => "InvalidNumber",
            FieldErrorKind::InvalidEnum { .. } => "InvalidEnum",
            FieldErrorKind::InvalidLength { .. } => "InvalidLength",
        }
    }
}

/// A failure located at a dotted path such as `server.port`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {kind}")]
pub struct FieldError {
    path: String,
    kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(path: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, FieldErrorKind::MissingRequiredField)
    }

    pub fn invalid_boolean(path: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(path, FieldErrorKind::InvalidBoolean { raw: raw.into() })
    }

    pub fn invalid_number(path: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(path, FieldErrorKind::InvalidNumber { raw: raw.into() })
    }

    pub fn invalid_enum(path: impl Into<String>, raw: impl Into<String>, allowed: &[&str]) -> Self {
        Self::new(
            path,
            FieldErrorKind::InvalidEnum {
                raw: raw.into(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    pub fn invalid_length(path: impl Into<String>, min: usize, actual: usize) -> Self {
        Self::new(path, FieldErrorKind::InvalidLength { min, actual })
    }

    /// Dotted path of the offending field
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &FieldErrorKind {
        &self.kind
    }

    /// Human-readable detail, without the path
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Every field failure found in one validation pass, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Wrap a list of failures. Returns `None` when the list is empty,
    /// so an empty error list can never be mistaken for a failure.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// Wrap failures gathered by a validation pass that did not produce a value
    pub(crate) fn collected(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    /// First error recorded at `path`, if any
    pub fn at(&self, path: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.path == path)
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
