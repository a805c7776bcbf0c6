//! Error types for `cargo-triconf`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failure to build a schema from source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    /// A source file is not valid Rust.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: Utf8PathBuf,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// An annotated declaration is not a struct with named fields.
    #[error("only structs with named fields are supported for generation: {name} is {description}")]
    UnsupportedType {
        /// Annotated type name.
        name: String,
        /// What the declaration resolved to.
        description: String,
    },
}

/// Errors surfaced by the generator pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// Schema extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Reading a source or writing an artefact failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: Utf8PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// An external step exited unsuccessfully.
    #[error("{command} failed (status {status}): {stderr}")]
    Command {
        /// Command name, e.g. `rustfmt`.
        command: String,
        /// Exit status, `-1` when terminated by a signal.
        status: i32,
        /// Captured standard error.
        stderr: String,
    },
}

impl GenerateError {
    /// Wrap an I/O failure at `path`.
    #[must_use]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
