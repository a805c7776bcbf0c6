//! Error types produced while binding and loading configuration.

mod aggregate;
mod constructors;
mod types;

pub use aggregate::LoadError;
pub use types::{BindError, ConfigError, ConversionError};

/// Result alias for operations that fail with a single [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests;
