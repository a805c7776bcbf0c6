//! Per-field declarations handed to the binder.

use crate::annotation::{FieldOptions, FlagAlias, GrammarError, Validation};

/// Declaration of one field: its identifier, serialization name, flag alias,
/// patterns and help text.
///
/// Options can be given through the builder methods or as annotation lines
/// in the `triconf:` grammar; both end up in the same [`FieldOptions`].
///
/// # Examples
///
/// ```
/// use triconf::FieldDecl;
/// let decl = FieldDecl::new("some_number")
///     .annotation("triconf:pflag some-number n")
///     .doc("How many things.");
/// assert_eq!(decl.ident(), "some_number");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldDecl {
    ident: String,
    rename: Option<String>,
    doc: String,
    annotations: Vec<String>,
    options: FieldOptions,
}

impl FieldDecl {
    /// Declare the field named `ident`.
    #[must_use]
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            ..Self::default()
        }
    }

    /// Serialization name; must match the field's `#[serde(rename)]`.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Flag alias and optional shorthand.
    #[must_use]
    pub fn flag(mut self, name: impl Into<String>, shorthand: Option<char>) -> Self {
        self.options.flag = Some(FlagAlias {
            name: name.into(),
            shorthand,
        });
        self
    }

    /// Regular expression the string form of the value must match.
    #[must_use]
    pub fn validate_regex(mut self, pattern: impl Into<String>) -> Self {
        self.options
            .validations
            .push(Validation::Regex(pattern.into()));
        self
    }

    /// Help text shown for the flag.
    #[must_use]
    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = text.into();
        self
    }

    /// Add one annotation line, e.g. `triconf:pflag port p`.
    #[must_use]
    pub fn annotation(mut self, line: impl Into<String>) -> Self {
        self.annotations.push(line.into());
        self
    }

    /// Field identifier.
    #[must_use]
    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub(crate) fn rename_ref(&self) -> Option<&str> {
        self.rename.as_deref()
    }

    pub(crate) fn into_doc(self) -> String {
        self.doc
    }

    /// Merge builder options with parsed annotations; annotations win.
    pub(crate) fn resolve(&self) -> Result<FieldOptions, GrammarError> {
        let (parsed, mut errors) = FieldOptions::from_annotations(&self.annotations);
        if !errors.is_empty() {
            return Err(errors.remove(0));
        }
        let mut options = self.options.clone();
        if parsed.flag.is_some() {
            options.flag = parsed.flag;
        }
        options.validations.extend(parsed.validations);
        Ok(options)
    }
}
