//! Figment provider for values that arrive as text.
//!
//! Environment variables and changed flags are parsed by their field's
//! [`ValueKind`] before they reach the store, so the store holds typed values
//! from every source and file values are never reparsed. Each entry is nested
//! under its dotted lookup key with [`Serialized::default`], so `log.level`
//! becomes `{"log": {"level": ...}}` next to any sibling under `log`.

use figment::{
    Figment, Metadata, Profile, Provider,
    error::Error,
    providers::Serialized,
    value::{Dict, Map},
};
use serde_json::Value;

use crate::env::env_value;
use crate::error::ConfigError;
use crate::scalar::{ValueKind, parse_scalar};

/// Typed entries from one textual source, exposed as one figment layer.
#[derive(Debug, Clone)]
pub struct TextLayer {
    name: &'static str,
    entries: Vec<(String, Value)>,
}

impl TextLayer {
    /// Parse `(lookup key, kind, raw text)` entries.
    ///
    /// Text that does not parse as its kind is left out of the layer and
    /// reported in `failures` against the key.
    pub fn parse<'a, I>(name: &'static str, texts: I, failures: &mut Vec<ConfigError>) -> Self
    where
        I: IntoIterator<Item = (&'a str, ValueKind, String)>,
    {
        let entries = texts
            .into_iter()
            .filter_map(|(key, kind, raw)| match parse_scalar(kind, &raw) {
                Ok(value) => Some((key.to_owned(), value)),
                Err(err) => {
                    tracing::debug!(key, source = name, error = %err, "unparsable value");
                    failures.push(ConfigError::conversion(key, err));
                    None
                }
            })
            .collect();
        Self { name, entries }
    }

    /// Read every `(lookup key, kind, variable name)` binding from the
    /// environment, skipping unset and empty variables.
    pub fn from_env<'a, I>(bindings: I, failures: &mut Vec<ConfigError>) -> Self
    where
        I: IntoIterator<Item = (&'a str, ValueKind, &'a str)>,
    {
        let present = bindings.into_iter().filter_map(|(key, kind, var)| {
            let raw = env_value(var)?;
            tracing::debug!(key, var, "environment variable present");
            Some((key, kind, raw))
        });
        Self::parse("environment", present, failures)
    }
}

impl Provider for TextLayer {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.name)
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let nested = self
            .entries
            .iter()
            .fold(Figment::new(), |figment, (key, value)| {
                figment.merge(Serialized::default(key, value))
            });
        Provider::data(&nested)
    }
}
