//! Annotation micro-grammar embedded in documentation comments.
//!
//! One directive per line, recognised by the `triconf:` prefix:
//!
//! ```text
//! triconf:generate [--filename|-f PATH] [--env-prefix|-e PREFIX]
//! triconf:pflag NAME [SHORTHAND]
//! triconf:validate regex "PATTERN"
//! ```
//!
//! Arguments are split into shell words before interpretation, so quoted
//! values may contain spaces.

mod words;

use regex::Regex;
use thiserror::Error;

use crate::error::ConfigError;

pub use words::{parse_generate_options, split_words};

/// Prefix that marks a documentation line as a directive.
pub const PREFIX: &str = "triconf:";

/// Failure to interpret directive text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GrammarError {
    /// Quotes in the argument text are unbalanced.
    #[error("cannot split {text:?} into words: unbalanced quotes")]
    Tokenize {
        /// Offending text.
        text: String,
    },

    /// The words do not map onto the directive's options.
    #[error("invalid options {text:?}: {message}")]
    Options {
        /// Offending text.
        text: String,
        /// Parser message.
        message: String,
    },

    /// Positional arguments have the wrong shape.
    #[error("{directive}: {message}")]
    Arguments {
        /// Directive keyword.
        directive: &'static str,
        /// What was wrong.
        message: String,
    },
}

/// Options selected by the type-level `generate` directive.
///
/// Empty strings mean "no config file" and "no prefix".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Configuration file to read, relative to the working directory.
    pub filename: String,
    /// Environment variable prefix, as written.
    pub env_prefix: String,
}

impl GenerationOptions {
    /// Parse option text, falling back to defaults when it is malformed.
    ///
    /// A partial directive never blocks generation; the failure is logged.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        parse_generate_options(text).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring malformed generate options");
            Self::default()
        })
    }
}

/// Flag alias declared with `pflag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagAlias {
    /// Long flag segment.
    pub name: String,
    /// Optional single-character shorthand.
    pub shorthand: Option<char>,
}

/// Pattern declared with `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Validation {
    /// The string value must match this regular expression.
    Regex(String),
}

impl Validation {
    /// Check `value` for the field at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the value does not match or
    /// the pattern does not compile.
    pub fn check(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        match self {
            Self::Regex(pattern) => {
                let re = Regex::new(pattern).map_err(|err| ConfigError::Validation {
                    key: key.to_owned(),
                    message: err.to_string(),
                })?;
                if re.is_match(value) {
                    Ok(())
                } else {
                    Err(ConfigError::Validation {
                        key: key.to_owned(),
                        message: format!("{value:?} does not match /{pattern}/"),
                    })
                }
            }
        }
    }
}

/// One parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Type-level generation request.
    Generate(GenerationOptions),
    /// Field-level flag alias.
    Flag(FlagAlias),
    /// Field-level pattern.
    Validate(Validation),
    /// A prefixed line with an unknown keyword; ignored by consumers.
    Unknown(String),
}

/// Return the directive body when `line` carries the prefix.
#[must_use]
pub fn strip_prefix(line: &str) -> Option<&str> {
    line.trim().strip_prefix(PREFIX)
}

impl Directive {
    /// Parse one documentation line.
    ///
    /// Returns `Ok(None)` for lines without the prefix.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] when a known directive has malformed
    /// arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use triconf::annotation::{Directive, FlagAlias};
    /// let parsed = Directive::parse("triconf:pflag port p").ok().flatten();
    /// assert_eq!(
    ///     parsed,
    ///     Some(Directive::Flag(FlagAlias { name: "port".into(), shorthand: Some('p') }))
    /// );
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>, GrammarError> {
        let Some(body) = strip_prefix(line) else {
            return Ok(None);
        };
        let body = body.trim_start();
        let (keyword, rest) = body
            .split_once(char::is_whitespace)
            .unwrap_or((body, ""));
        let directive = match keyword {
            "generate" => Self::Generate(parse_generate_options(rest)?),
            "pflag" => Self::Flag(parse_flag(rest)?),
            "validate" => Self::Validate(parse_validation(rest)?),
            other => Self::Unknown(other.to_owned()),
        };
        Ok(Some(directive))
    }
}

fn parse_flag(text: &str) -> Result<FlagAlias, GrammarError> {
    let words = split_words(text)?;
    let mut iter = words.into_iter();
    let Some(name) = iter.next().filter(|n| !n.is_empty() && !n.starts_with('-')) else {
        return Err(GrammarError::Arguments {
            directive: "pflag",
            message: "expected a flag name".to_owned(),
        });
    };
    let shorthand = match iter.next() {
        None => None,
        Some(short) => {
            let mut chars = short.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != '-' => Some(c),
                _ => {
                    return Err(GrammarError::Arguments {
                        directive: "pflag",
                        message: format!("shorthand {short:?} must be a single character"),
                    });
                }
            }
        }
    };
    if let Some(extra) = iter.next() {
        return Err(GrammarError::Arguments {
            directive: "pflag",
            message: format!("unexpected argument {extra:?}"),
        });
    }
    Ok(FlagAlias { name, shorthand })
}

fn parse_validation(text: &str) -> Result<Validation, GrammarError> {
    let words = split_words(text)?;
    match words.as_slice() {
        [kind, pattern] if kind == "regex" => {
            Regex::new(pattern).map_err(|err| GrammarError::Arguments {
                directive: "validate",
                message: err.to_string(),
            })?;
            Ok(Validation::Regex(pattern.clone()))
        }
        _ => Err(GrammarError::Arguments {
            directive: "validate",
            message: format!("expected `regex \"PATTERN\"`, got {text:?}"),
        }),
    }
}

/// Field-level options folded from a field's annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Flag alias, if declared. A later `pflag` replaces an earlier one.
    pub flag: Option<FlagAlias>,
    /// Declared patterns, in order.
    pub validations: Vec<Validation>,
}

impl FieldOptions {
    /// Fold `annotations` into options.
    ///
    /// Every line is attempted; lines that fail to parse are returned next to
    /// the options built from the rest.
    pub fn from_annotations<I, S>(annotations: I) -> (Self, Vec<GrammarError>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (parsed, errors): (Vec<_>, Vec<_>) = annotations
            .into_iter()
            .map(|line| Directive::parse(line.as_ref()))
            .partition(Result::is_ok);
        let mut options = Self::default();
        for directive in parsed.into_iter().filter_map(Result::ok).flatten() {
            match directive {
                Directive::Flag(alias) => options.flag = Some(alias),
                Directive::Validate(v) => options.validations.push(v),
                Directive::Generate(_) | Directive::Unknown(_) => {}
            }
        }
        (options, errors.into_iter().filter_map(Result::err).collect())
    }
}
