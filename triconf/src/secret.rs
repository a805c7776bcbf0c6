//! String values that must not appear in logs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A string whose `Display` and `Debug` output is masked with `*`.
///
/// Only the formatting traits mask. Serialization is transparent, since
/// loaders round-trip records through their serde form, so a serialized
/// record carries the secret in clear.
///
/// # Examples
///
/// ```
/// use triconf::SecretString;
/// let token = SecretString::new("hunter2");
/// assert_eq!(token.to_string(), "*******");
/// assert_eq!(token.expose(), "hunter2");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap `value`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The unmasked value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&"*".repeat(self.0.chars().count()))
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({self})")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}
