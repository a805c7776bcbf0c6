//! Value kinds and the textual parsers shared by binder and generated code.
//!
//! Environment variables and flags arrive as text. Both the runtime binder and
//! generated loaders parse them with the functions here so the two forms agree
//! bit for bit. Values read from a configuration file are never reparsed.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ConversionError;

/// Shape of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueKind {
    /// `bool`.
    Bool,
    /// Integer of the given width.
    Int {
        /// Width in bits; `isize`/`usize` report the pointer width.
        bits: u8,
        /// Whether the type is signed.
        signed: bool,
    },
    /// Float of the given width.
    Float {
        /// Width in bits.
        bits: u8,
    },
    /// UTF-8 text.
    String,
    /// Sequence loaded as one opaque value.
    List,
    /// String-keyed map loaded as one opaque value.
    Map,
    /// A kind that cannot be bound; carries a description for diagnostics.
    Unsupported(&'static str),
}

impl ValueKind {
    /// Whether a flag for this kind may be given without a value.
    #[must_use]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int { bits, signed: true } => write!(f, "i{bits}"),
            Self::Int {
                bits,
                signed: false,
            } => write!(f, "u{bits}"),
            Self::Float { bits } => write!(f, "f{bits}"),
            Self::String => f.write_str("string"),
            Self::List => f.write_str("list"),
            Self::Map => f.write_str("map"),
            Self::Unsupported(kind) => f.write_str(kind),
        }
    }
}

/// Error returned by [`parse_bool`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid boolean {0:?}")]
pub struct ParseBoolError(String);

/// Permissive boolean parser.
///
/// Accepts `1`, `t`, `T`, `true`, `TRUE`, `True` and the matching false
/// spellings.
///
/// # Errors
///
/// Returns [`ParseBoolError`] for anything else.
///
/// # Examples
///
/// ```
/// use triconf::scalar::parse_bool;
/// assert_eq!(parse_bool("T"), Ok(true));
/// assert_eq!(parse_bool("0"), Ok(false));
/// assert!(parse_bool("yes").is_err());
/// ```
pub fn parse_bool(raw: &str) -> Result<bool, ParseBoolError> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(ParseBoolError(other.to_owned())),
    }
}

/// Error returned by [`parse_number`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseNumberError(String);

/// Integer and float types loadable from text.
///
/// Floats must be finite: the intermediate JSON form has no spelling for
/// `inf` or `NaN`, so both loaders reject them.
pub trait Number: FromStr + Into<Value> {
    /// Whether the parsed value can be stored.
    fn is_storable(&self) -> bool {
        true
    }
}

macro_rules! integer_numbers {
    ($($ty:ty),* $(,)?) => {
        $(impl Number for $ty {})*
    };
}

integer_numbers!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Number for f32 {
    fn is_storable(&self) -> bool {
        self.is_finite()
    }
}

impl Number for f64 {
    fn is_storable(&self) -> bool {
        self.is_finite()
    }
}

/// Parse `raw` as the number type `T`.
///
/// # Errors
///
/// Returns [`ParseNumberError`] when the text does not parse at `T`'s width
/// or denotes a non-finite float (`inf`, `NaN`, or an overflow such as
/// `1e400`).
///
/// # Examples
///
/// ```
/// use triconf::scalar::parse_number;
/// assert_eq!(parse_number::<u8>("255"), Ok(255));
/// assert!(parse_number::<u8>("256").is_err());
/// assert!(parse_number::<f64>("NaN").is_err());
/// ```
pub fn parse_number<T>(raw: &str) -> Result<T, ParseNumberError>
where
    T: Number,
    T::Err: fmt::Display,
{
    let value = raw
        .parse::<T>()
        .map_err(|err| ParseNumberError(err.to_string()))?;
    if value.is_storable() {
        Ok(value)
    } else {
        Err(ParseNumberError("number is not finite".to_owned()))
    }
}

fn parse_as<T>(raw: &str, kind: ValueKind) -> Result<Value, ConversionError>
where
    T: Number,
    T::Err: fmt::Display,
{
    parse_number::<T>(raw)
        .map(Into::into)
        .map_err(|err| ConversionError::Scalar {
            value: raw.to_owned(),
            target: kind.to_string(),
            message: err.to_string(),
        })
}

/// Parse `raw` as `kind`, producing the intermediate JSON value.
///
/// Integers and floats are parsed at the exact declared width. Strings pass
/// through. Lists accept a JSON array or a comma-separated list; maps accept a
/// JSON object.
///
/// # Errors
///
/// Returns [`ConversionError::Scalar`] when the text does not parse.
pub fn parse_scalar(kind: ValueKind, raw: &str) -> Result<Value, ConversionError> {
    match kind {
        ValueKind::Bool => parse_bool(raw)
            .map(Value::Bool)
            .map_err(|err| ConversionError::Scalar {
                value: raw.to_owned(),
                target: kind.to_string(),
                message: err.to_string(),
            }),
        ValueKind::Int { bits, signed } => parse_int(raw, bits, signed, kind),
        ValueKind::Float { bits: 32 } => parse_as::<f32>(raw, kind),
        ValueKind::Float { .. } => parse_as::<f64>(raw, kind),
        ValueKind::List => Ok(parse_list(raw)),
        ValueKind::Map => serde_json::from_str(raw).map_err(|err| ConversionError::Scalar {
            value: raw.to_owned(),
            target: kind.to_string(),
            message: err.to_string(),
        }),
        ValueKind::String | ValueKind::Unsupported(_) => Ok(Value::String(raw.to_owned())),
    }
}

fn parse_int(raw: &str, bits: u8, signed: bool, kind: ValueKind) -> Result<Value, ConversionError> {
    match (bits, signed) {
        (8, true) => parse_as::<i8>(raw, kind),
        (16, true) => parse_as::<i16>(raw, kind),
        (32, true) => parse_as::<i32>(raw, kind),
        (_, true) => parse_as::<i64>(raw, kind),
        (8, false) => parse_as::<u8>(raw, kind),
        (16, false) => parse_as::<u16>(raw, kind),
        (32, false) => parse_as::<u32>(raw, kind),
        (_, false) => parse_as::<u64>(raw, kind),
    }
}

fn parse_list(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str(trimmed) {
            return value;
        }
    }
    Value::Array(
        trimmed
            .split(',')
            .map(|s| Value::String(s.trim().to_owned()))
            .collect(),
    )
}
