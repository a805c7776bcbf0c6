//! Reading configuration files into a generic JSON document.
//!
//! The extension selects the parser: `.yaml` and `.yml` go through
//! `serde-saphyr`, `.json` through `serde_json`. Both produce the same
//! intermediate [`serde_json::Value`], which must be a map at the top level.

mod yaml;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::Value;

use crate::error::ConfigError;

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Indentation-based block format (`.yaml`, `.yml`).
    Yaml,
    /// Bracketed format (`.json`).
    Json,
}

impl FileFormat {
    /// Select the format for `path` from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFileType`] for any other extension.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let ext = path.extension().map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFileType {
                path: path.to_path_buf(),
                extension: path.extension().unwrap_or_default().to_owned(),
            }),
        }
    }
}

/// Parse `contents` as `format`.
///
/// # Errors
///
/// Returns [`ConfigError::File`] when the text does not parse or its top level
/// is not a map.
pub fn parse_document(
    path: &Utf8Path,
    format: FileFormat,
    contents: &str,
) -> Result<Value, ConfigError> {
    let value = match format {
        FileFormat::Yaml => yaml::parse(contents).map_err(|err| ConfigError::file(path, err))?,
        FileFormat::Json => {
            serde_json::from_str(contents).map_err(|err| ConfigError::file(path, err))?
        }
    };
    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(serde_json::Map::new())),
        other => Err(ConfigError::invalid_data(
            path,
            format!("expected a map at the top level, found {}", kind_name(&other)),
        )),
    }
}

const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a map",
    }
}

/// Read and parse the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedFileType`] before touching the disk when
/// the extension is unknown, and [`ConfigError::File`] when the file cannot
/// be read or parsed.
///
/// # Examples
///
/// ```rust,no_run
/// use camino::Utf8Path;
/// let doc = triconf::read_document(Utf8Path::new("config.yaml"))?;
/// assert!(doc.is_object());
/// # Ok::<_, triconf::ConfigError>(())
/// ```
pub fn read_document(path: &Utf8Path) -> Result<Value, ConfigError> {
    let format = FileFormat::from_path(path)?;
    let contents = read_to_string(path)?;
    tracing::debug!(path = %path, ?format, "read configuration file");
    parse_document(path, format, &contents)
}

fn read_to_string(path: &Utf8Path) -> Result<String, ConfigError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| ConfigError::invalid_data(path, "path does not name a file"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| ConfigError::file(path, err))?;
    dir.read_to_string(name)
        .map_err(|err| ConfigError::file(path, err))
}

#[cfg(test)]
mod tests;
