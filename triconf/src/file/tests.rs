//! Tests for file format selection and parsing.

use super::*;
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case("config.yaml", FileFormat::Yaml)]
#[case("config.YML", FileFormat::Yaml)]
#[case("dir/config.json", FileFormat::Json)]
fn formats_follow_the_extension(#[case] path: &str, #[case] expected: FileFormat) {
    assert_eq!(FileFormat::from_path(Utf8Path::new(path)).ok(), Some(expected));
}

#[rstest]
#[case("config.toml", "toml")]
#[case("config", "")]
fn unknown_extensions_are_unsupported(#[case] path: &str, #[case] ext: &str) {
    let err = FileFormat::from_path(Utf8Path::new(path)).err();
    assert!(
        matches!(&err, Some(ConfigError::UnsupportedFileType { extension, .. }) if extension == ext),
        "{err:?}"
    );
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("unsupported file type"), "{message}");
}

#[test]
fn yaml_and_json_produce_the_same_document() -> Result<()> {
    let path = Utf8Path::new("inline");
    let yaml = parse_document(
        path,
        FileFormat::Yaml,
        "port: \"80\"\nlog:\n  level: debug\nflags: [a, b]\n",
    )?;
    let json = parse_document(
        path,
        FileFormat::Json,
        r#"{"port": "80", "log": {"level": "debug"}, "flags": ["a", "b"]}"#,
    )?;
    ensure!(yaml == json, "documents differ: {yaml} vs {json}");
    ensure!(yaml == json!({"port": "80", "log": {"level": "debug"}, "flags": ["a", "b"]}));
    Ok(())
}

#[test]
fn yaml_booleans_are_strict() -> Result<()> {
    let doc = parse_document(Utf8Path::new("x.yaml"), FileFormat::Yaml, "a: yes\nb: true\n")?;
    ensure!(doc == json!({"a": "yes", "b": true}), "unexpected {doc}");
    Ok(())
}

#[test]
fn top_level_must_be_a_map() {
    let err = parse_document(Utf8Path::new("x.json"), FileFormat::Json, "[1, 2]").err();
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("expected a map"), "{message}");
}

#[test]
fn reads_from_disk_relative_to_the_working_directory() -> Result<()> {
    test_helpers::figment::with_jail(|jail| {
        jail.create_file("settings.json", r#"{"name": "svc"}"#)?;
        let doc = read_document(Utf8Path::new("settings.json"))?;
        ensure!(doc == json!({"name": "svc"}), "unexpected {doc}");
        Ok(())
    })
}

#[test]
fn missing_file_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("absent.yaml"))
        .map_err(|p| anyhow!("non UTF-8 temp path {}", p.display()))?;
    let err = read_document(&path).err();
    ensure!(matches!(err, Some(ConfigError::File { .. })), "{err:?}");
    Ok(())
}
