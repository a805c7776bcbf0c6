//! YAML parsing backed by `serde-saphyr`.

use serde_json::Value;
use serde_saphyr::Options;

/// Parse YAML into the intermediate JSON form using strict boolean semantics.
pub(super) fn parse(contents: &str) -> Result<Value, serde_saphyr::Error> {
    serde_saphyr::from_str_with_options(
        contents,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
}
