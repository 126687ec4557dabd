//! Secret string type for safe credential handling.
//!
//! Provides a wrapper type that prevents accidental logging of sensitive values.

use serde::Serialize;
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// A wrapper for secrets that prevents accidental logging.
///
/// `SecretString` keeps values like session secrets and captcha keys out of
/// debug output, logs and printed configuration.
///
/// # Features
/// - `Debug`, `Display` and `Serialize` show `[REDACTED]` instead of the value
/// - Explicit `expose_secret()` method required to access the actual value
/// - Clears memory on drop (best-effort, not cryptographically secure)
///
/// # Example
/// ```
/// use bootcfg::util::SecretString;
///
/// let secret = SecretString::new("my-session-secret");
/// assert_eq!(format!("{:?}", secret), "[REDACTED]");
/// assert_eq!(secret.expose_secret(), "my-session-secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret from any string-like value.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Explicitly expose the secret value.
    ///
    /// Use this method only when the secret value is actually needed,
    /// such as when signing session tokens.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Length in characters, usable in validation without exposing the value.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best-effort only: the value may already have been copied elsewhere.
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(REDACTED)
    }
}
