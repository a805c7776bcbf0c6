//! Aggregation of every failure produced by a single load.

use std::{error::Error, fmt, sync::Arc};

use super::ConfigError;

/// Every failure collected while loading, in the order the loaders ran.
///
/// A `LoadError` is built even when only one loader fails, so callers can
/// always iterate the causes.
///
/// # Examples
///
/// ```
/// use triconf::{ConfigError, LoadError};
/// let err = LoadError::try_from_failures(vec![
///     ConfigError::Validation { key: "port".into(), message: "must be positive".into() },
///     ConfigError::Unbound,
/// ]);
/// assert_eq!(err.map(|e| e.len()), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct LoadError(Vec<Arc<ConfigError>>);

impl LoadError {
    /// Collects `failures`, returning `None` when there are none.
    #[must_use]
    pub fn try_from_failures<I, E>(failures: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<ConfigError>>,
    {
        let errors: Vec<Arc<ConfigError>> = failures.into_iter().map(Into::into).collect();
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// Wraps a single failure.
    #[must_use]
    pub fn single(error: ConfigError) -> Self {
        Self(vec![Arc::new(error)])
    }

    /// Iterate over the contained failures.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.0.iter().map(Arc::as_ref)
    }

    /// Number of failures.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; an empty aggregate is never constructed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl Error for LoadError {}

impl From<ConfigError> for LoadError {
    fn from(error: ConfigError) -> Self {
        Self::single(error)
    }
}

impl<'a> IntoIterator for &'a LoadError {
    type Item = &'a ConfigError;
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, Arc<ConfigError>>,
        fn(&'a Arc<ConfigError>) -> &'a ConfigError,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(Arc::as_ref)
    }
}

impl IntoIterator for LoadError {
    type Item = Arc<ConfigError>;
    type IntoIter = std::vec::IntoIter<Arc<ConfigError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
