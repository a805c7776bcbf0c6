//! Where a loader looks for values.

use camino::{Utf8Path, Utf8PathBuf};

use crate::annotation::GenerationOptions;
use crate::path::normalize_prefix;

/// File, environment prefix and program name used by a [`crate::Loader`].
///
/// # Examples
///
/// ```
/// use triconf::Sources;
/// let sources = Sources::new().file("config.yaml").env_prefix("app");
/// assert_eq!(sources.prefix(), "APP_");
/// assert_eq!(sources.file_path().map(|p| p.as_str()), Some("config.yaml"));
/// ```
#[derive(Debug, Clone)]
pub struct Sources {
    file: Option<Utf8PathBuf>,
    env_prefix: String,
    program_name: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            file: None,
            env_prefix: String::new(),
            program_name: env!("CARGO_PKG_NAME").to_owned(),
        }
    }
}

impl Sources {
    /// No file, no prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources selected by a `generate` directive.
    #[must_use]
    pub fn from_options(options: &GenerationOptions) -> Self {
        let mut sources = Self::new().env_prefix(&options.env_prefix);
        if !options.filename.is_empty() {
            sources = sources.file(&options.filename);
        }
        sources
    }

    /// Read configuration from `path`; a missing file fails the load.
    #[must_use]
    pub fn file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Prefix for environment variable names.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.env_prefix = normalize_prefix(prefix.as_ref());
        self
    }

    /// Name shown in flag usage and errors.
    #[must_use]
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    /// Configured file, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Utf8Path> {
        self.file.as_deref()
    }

    /// Normalized prefix, e.g. `APP_`, or empty.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Program name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.program_name
    }
}
