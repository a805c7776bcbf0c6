//! Error enums for the bind, load and conversion phases.

use camino::Utf8PathBuf;
use figment::Error as FigmentError;
use thiserror::Error;

use crate::annotation::GrammarError;

/// A single failure raised by one phase of a load.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read or parsed.
    #[error("configuration file error in '{path}': {source}")]
    File {
        /// File that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying read or parse error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The file extension does not select a known parser.
    #[error("unsupported file type {extension:?} for '{path}'")]
    UnsupportedFileType {
        /// File whose extension was rejected.
        path: Utf8PathBuf,
        /// Extension as written, without the leading dot.
        extension: String,
    },

    /// The merged store could not be assembled from its providers.
    #[error("failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// A stored value does not fit the bound field.
    #[error("cannot load '{key}': {source}")]
    Conversion {
        /// Dotted lookup key of the field.
        key: String,
        /// Conversion failure.
        #[source]
        source: ConversionError,
    },

    /// An environment variable could not be parsed into its field.
    #[error("parsing {var} into '{field}' as {target}: {message}")]
    EnvParse {
        /// Environment variable name.
        var: String,
        /// Field path that was being assigned.
        field: String,
        /// Declared type of the field.
        target: String,
        /// Parser message.
        message: String,
    },

    /// A flag value could not be parsed into its field.
    #[error("parsing --{flag} into '{field}' as {target}: {message}")]
    FlagValue {
        /// Flag name without dashes.
        flag: String,
        /// Field path that was being assigned.
        field: String,
        /// Declared type of the field.
        target: String,
        /// Parser message.
        message: String,
    },

    /// Command-line flags were rejected by the parser.
    #[error("failed to parse command-line flags: {0}")]
    Flags(#[from] Box<clap::Error>),

    /// `load` was called on a loader that has never been bound.
    #[error("bind must be called before the first load")]
    Unbound,

    /// A field value does not satisfy its declared pattern.
    #[error("validation failed for '{key}': {message}")]
    Validation {
        /// Dotted lookup key of the field.
        key: String,
        /// Explanation of the mismatch.
        message: String,
    },
}

/// Failure to represent a stored value in the target field type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// A textual value could not be parsed as the declared scalar.
    #[error("cannot parse {value:?} as {target}: {message}")]
    Scalar {
        /// Raw text.
        value: String,
        /// Target kind.
        target: String,
        /// Parser message.
        message: String,
    },

    /// The intermediate JSON value does not deserialize into the field.
    #[error("unable to parse data {value} into type {target}: {source}")]
    Json {
        /// Intermediate value, rendered as JSON.
        value: String,
        /// Rust type of the field.
        target: &'static str,
        /// Deserializer error.
        #[source]
        source: serde_json::Error,
    },

    /// The merged store holds a value that has no JSON form.
    #[error("stored value is not representable: {0}")]
    Store(Box<FigmentError>),
}

/// Structural failure while registering a record's fields.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    /// A field's kind has no loader.
    #[error("in lookup path {path:?} of {type_name}: value cannot be bound ({kind})")]
    Unbindable {
        /// Bound root type.
        type_name: &'static str,
        /// Dotted lookup path of the field.
        path: String,
        /// Description of the rejected kind.
        kind: &'static str,
    },

    /// Two fields resolve to the same flag name.
    #[error("in lookup path {path:?} of {type_name}: flag --{flag} is already bound to {existing:?}")]
    DuplicateFlag {
        /// Bound root type.
        type_name: &'static str,
        /// Dotted lookup path of the second field.
        path: String,
        /// Conflicting flag name.
        flag: String,
        /// Lookup key that registered the flag first.
        existing: String,
    },

    /// Two fields declare the same shorthand.
    #[error("in lookup path {path:?} of {type_name}: shorthand -{short} is already bound")]
    DuplicateShorthand {
        /// Bound root type.
        type_name: &'static str,
        /// Dotted lookup path of the second field.
        path: String,
        /// Conflicting shorthand.
        short: char,
    },

    /// A field annotation could not be parsed.
    #[error("in lookup path {path:?} of {type_name}: {source}")]
    Annotation {
        /// Bound root type.
        type_name: &'static str,
        /// Dotted lookup path of the field.
        path: String,
        /// Grammar failure.
        #[source]
        source: GrammarError,
    },
}
