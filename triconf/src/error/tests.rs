//! Tests for error rendering and aggregation.

use super::*;
use camino::Utf8Path;
use rstest::rstest;

#[test]
fn aggregate_numbers_each_failure() {
    let err = LoadError::try_from_failures(vec![
        ConfigError::env_parse("APP_PORT", "port", "u16", "invalid digit found in string"),
        ConfigError::Unbound,
    ]);
    assert_eq!(
        err.map(|e| e.to_string()).as_deref(),
        Some(concat!(
            "1: parsing APP_PORT into 'port' as u16: invalid digit found in string\n",
            "2: bind must be called before the first load",
        ))
    );
}

#[test]
fn empty_failures_build_nothing() {
    assert!(LoadError::try_from_failures(Vec::<ConfigError>::new()).is_none());
}

#[test]
fn aggregate_iterates_in_order() {
    let err = LoadError::from(ConfigError::Unbound);
    assert_eq!(err.len(), 1);
    assert!(!err.is_empty());
    assert!(matches!((&err).into_iter().next(), Some(ConfigError::Unbound)));
    assert_eq!(err.into_iter().count(), 1);
}

#[rstest]
#[case(ConfigError::invalid_data(Utf8Path::new("c.yaml"), "bad"), "configuration file error in 'c.yaml': bad")]
#[case(
    ConfigError::UnsupportedFileType { path: "c.toml".into(), extension: "toml".into() },
    "unsupported file type \"toml\" for 'c.toml'"
)]
#[case(
    ConfigError::Validation { key: "log.level".into(), message: "no match".into() },
    "validation failed for 'log.level': no match"
)]
fn messages_name_their_subject(#[case] err: ConfigError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[test]
fn conversion_errors_keep_their_source() {
    let err = ConfigError::conversion(
        "port",
        ConversionError::Scalar {
            value: "x".into(),
            target: "u16".into(),
            message: "invalid digit found in string".into(),
        },
    );
    assert_eq!(
        err.to_string(),
        "cannot load 'port': cannot parse \"x\" as u16: invalid digit found in string"
    );
    assert!(std::error::Error::source(&err).is_some());
}
