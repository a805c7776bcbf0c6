//! Naming rules that turn a field path into its three keys.
//!
//! Every field contributes one [`FieldNames`] entry to a [`FieldPath`]:
//!
//! - a lookup segment (serialization name, else the identifier), joined with
//!   `.` to address the merged store;
//! - an environment segment (`SHOUTY_SNAKE_CASE` of the identifier, never the
//!   serialization name), joined with `_` after the prefix;
//! - a flag segment (the declared alias, possibly empty), with the non-empty
//!   segments joined by `-`.

use heck::ToShoutySnakeCase;

/// Names contributed by one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    lookup: String,
    env: String,
    flag: String,
}

impl FieldNames {
    /// Derive the names for `ident`.
    ///
    /// # Examples
    ///
    /// ```
    /// use triconf::FieldNames;
    /// let names = FieldNames::new("SomeNumber", None, Some("some-number"));
    /// assert_eq!(names.lookup_key(), "SomeNumber");
    /// assert_eq!(names.env_suffix(), "SOME_NUMBER");
    /// assert_eq!(names.flag_segment(), "some-number");
    /// ```
    #[must_use]
    pub fn new(ident: &str, rename: Option<&str>, flag_alias: Option<&str>) -> Self {
        let ident = ident.strip_prefix("r#").unwrap_or(ident);
        Self {
            lookup: rename.unwrap_or(ident).to_owned(),
            env: env_suffix(ident),
            flag: flag_alias.unwrap_or_default().to_owned(),
        }
    }

    /// Serialization name of the field.
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        &self.lookup
    }

    /// Upper snake case of the identifier.
    #[must_use]
    pub fn env_suffix(&self) -> &str {
        &self.env
    }

    /// Declared flag alias, empty when none.
    #[must_use]
    pub fn flag_segment(&self) -> &str {
        &self.flag
    }
}

/// Upper snake case of an identifier: `SomeNumber` and `some_number` both
/// become `SOME_NUMBER`.
#[must_use]
pub fn env_suffix(ident: &str) -> String {
    ident.to_shouty_snake_case()
}

/// Normalize an environment prefix so it can be concatenated with a suffix.
///
/// Trailing underscores are trimmed and one is appended back; an empty prefix
/// stays empty.
///
/// # Examples
///
/// ```
/// use triconf::normalize_prefix;
/// assert_eq!(normalize_prefix("app"), "APP_");
/// assert_eq!(normalize_prefix("APP__"), "APP_");
/// assert_eq!(normalize_prefix(""), "");
/// ```
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('_');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}_", trimmed.to_ascii_uppercase())
    }
}

/// Stack of names from the record root down to the field being visited.
#[derive(Debug, Default, Clone)]
pub struct FieldPath {
    segments: Vec<FieldNames>,
}

impl FieldPath {
    /// An empty path, positioned at the record root.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Descend into a field.
    pub fn push(&mut self, names: FieldNames) {
        self.segments.push(names);
    }

    /// Return from the innermost field.
    pub fn pop(&mut self) -> Option<FieldNames> {
        self.segments.pop()
    }

    /// Run `visit` with `names` pushed, popping it again whatever `visit`
    /// returns.
    pub fn scoped<T>(&mut self, names: FieldNames, visit: impl FnOnce(&mut Self) -> T) -> T {
        self.push(names);
        let out = visit(self);
        self.pop();
        out
    }

    /// Number of segments.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Innermost segment.
    #[must_use]
    pub fn leaf(&self) -> Option<&FieldNames> {
        self.segments.last()
    }

    /// Dotted lookup key, e.g. `log.level`.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        self.segments
            .iter()
            .map(FieldNames::lookup_key)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Flag name built from the non-empty aliases, `None` when every alias is
    /// empty.
    #[must_use]
    pub fn flag_key(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(FieldNames::flag_segment)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("-"))
        }
    }

    /// Environment variable name under `prefix`, e.g. `APP_LOG_LEVEL`.
    ///
    /// The prefix is passed through [`normalize_prefix`].
    #[must_use]
    pub fn env_var(&self, prefix: &str) -> String {
        let suffix = self
            .segments
            .iter()
            .map(FieldNames::env_suffix)
            .collect::<Vec<_>>()
            .join("_");
        format!("{}{suffix}", normalize_prefix(prefix))
    }
}
