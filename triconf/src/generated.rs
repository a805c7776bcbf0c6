//! Runtime support for loaders emitted by `cargo triconf`.
//!
//! Generated code calls only into this module, the flag helpers and the
//! scalar parsers, so it stays readable and the parsing rules stay shared with
//! the binder.

use camino::Utf8Path;
use serde_json::Value;

use crate::error::ConfigError;
use crate::file::read_document;
use crate::merge::merge_value;

pub use crate::env::env_value;
pub use crate::flags::{changed_value, flag_arg, flag_command};
pub use crate::scalar::{parse_bool, parse_number};
pub use serde::Serialize;
pub use serde::de::DeserializeOwned;

/// Parsed configuration file contents.
pub type Document = Value;

/// Read and parse `filename`, selecting the parser by extension.
///
/// An empty `filename` means the loader has no file and yields `None`.
///
/// # Errors
///
/// See [`read_document`].
pub fn read_file(filename: &str) -> Result<Option<Document>, ConfigError> {
    if filename.is_empty() {
        return Ok(None);
    }
    read_document(Utf8Path::new(filename)).map(Some)
}

/// Overlay `document` onto `target`.
///
/// Keys present in the document replace the matching fields; nested maps are
/// merged; absent keys and `null` leave the target untouched.
///
/// # Errors
///
/// Returns [`ConfigError::File`] naming `filename` when the merged value does
/// not deserialize into `T`.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Serialize, Deserialize)]
/// struct Config { port: u16, host: String }
///
/// let mut config = Config { port: 1, host: "localhost".into() };
/// triconf::generated::overlay(&mut config, json!({"port": 2}), "inline.json")?;
/// assert_eq!((config.port, config.host.as_str()), (2, "localhost"));
/// # Ok::<_, triconf::ConfigError>(())
/// ```
pub fn overlay<T>(target: &mut T, document: Document, filename: &str) -> Result<(), ConfigError>
where
    T: Serialize + DeserializeOwned,
{
    let path = Utf8Path::new(filename);
    let mut merged = serde_json::to_value(&*target).map_err(|err| ConfigError::file(path, err))?;
    merge_value(&mut merged, document);
    *target = serde_json::from_value(merged).map_err(|err| ConfigError::file(path, err))?;
    Ok(())
}
