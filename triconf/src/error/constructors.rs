//! Shorthand constructors for `ConfigError`.

use std::error::Error;
use std::fmt::Display;

use camino::Utf8Path;

use super::{ConfigError, ConversionError};

impl ConfigError {
    /// Construct a [`ConfigError::File`] for `path`.
    #[must_use]
    pub fn file(path: &Utf8Path, err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source: err.into(),
        }
    }

    /// A file that parsed but does not hold the expected shape.
    #[must_use]
    pub fn invalid_data(path: &Utf8Path, msg: impl Into<String>) -> Self {
        Self::file(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, msg.into()),
        )
    }

    /// Environment parse failure for `field`.
    #[must_use]
    pub fn env_parse(var: &str, field: &str, target: &str, err: impl Display) -> Self {
        Self::EnvParse {
            var: var.to_owned(),
            field: field.to_owned(),
            target: target.to_owned(),
            message: err.to_string(),
        }
    }

    /// Flag value parse failure for `field`.
    #[must_use]
    pub fn flag_value(flag: &str, field: &str, target: &str, err: impl Display) -> Self {
        Self::FlagValue {
            flag: flag.to_owned(),
            field: field.to_owned(),
            target: target.to_owned(),
            message: err.to_string(),
        }
    }

    /// Flag parse failure.
    #[must_use]
    pub fn flags(err: clap::Error) -> Self {
        Self::Flags(Box::new(err))
    }

    /// Conversion failure for the field at `key`.
    #[must_use]
    pub fn conversion(key: &str, source: ConversionError) -> Self {
        Self::Conversion {
            key: key.to_owned(),
            source,
        }
    }

    /// Failure to assemble the merged store.
    #[must_use]
    pub fn gathering(source: figment::Error) -> Self {
        Self::Gathering(Box::new(source))
    }
}
