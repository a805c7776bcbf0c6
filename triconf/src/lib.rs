//! Load a configuration record from a file, the environment and
//! command-line flags.
//!
//! A record describes its fields once through [`Bind`]. A [`Loader`] then
//! derives three names for every leaf (a dotted lookup key, an environment
//! variable and, when the leaf declares an alias, a flag) and fills the record
//! from those sources, later sources overriding earlier ones:
//!
//! 1. the configuration file (`.yaml`, `.yml` or `.json`);
//! 2. environment variables under the configured prefix;
//! 3. flags the user actually passed.
//!
//! Fields untouched by every source keep the value they were bound with.
//!
//! The same rules drive the source generator in `cargo-triconf`, which emits a
//! `triconf_load` method per annotated type. Generated code calls into
//! [`generated`] and [`scalar`] so both forms parse values identically.

pub mod annotation;
mod bind;
mod env;
mod error;
mod file;
mod flags;
pub mod generated;
mod layer;
mod loader;
mod merge;
mod path;
pub mod scalar;
mod secret;
#[cfg(feature = "watch")]
mod watch;

pub use annotation::{GenerationOptions, GrammarError};
pub use bind::{Bind, FieldDecl, Fields, FlagSpec, Leaf};
pub use env::env_value;
pub use error::{BindError, ConfigError, ConfigResult, ConversionError, LoadError};
pub use file::{FileFormat, read_document};
pub use flags::{changed_value, flag_arg, flag_command};
pub use loader::{Loader, Sources};
pub use path::{FieldNames, FieldPath, env_suffix, normalize_prefix};
pub use scalar::ValueKind;
pub use secret::SecretString;
#[cfg(feature = "watch")]
pub use watch::{FileWatcher, watch_file};
