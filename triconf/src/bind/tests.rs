//! Tests for field registration.

use std::cell::Cell;

use super::*;
use crate::FieldDecl;
use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Inner {
    level: String,
    verbose: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Outer {
    port: u16,
    #[serde(rename = "host_name")]
    host: String,
    inner: Inner,
    extra: Option<Inner>,
    limit: Option<i32>,
}

impl Bind for Inner {
    fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
        fields
            .leaf(FieldDecl::new("level").flag("level", None), |i| &mut i.level)?
            .leaf(FieldDecl::new("verbose"), |i| &mut i.verbose)?;
        Ok(())
    }
}

impl Bind for Outer {
    fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
        fields
            .leaf(
                FieldDecl::new("port").annotation("triconf:pflag port p"),
                |o| &mut o.port,
            )?
            .leaf(FieldDecl::new("host").rename("host_name"), |o| &mut o.host)?
            .record(FieldDecl::new("inner").flag("inner", None), |o| &mut o.inner)?
            .optional_record(FieldDecl::new("extra"), |o| &mut o.extra)?
            .leaf(FieldDecl::new("limit").flag("limit", None), |o| &mut o.limit)?;
        Ok(())
    }
}

fn bind_outer() -> (Outer, Registry<Outer>) {
    let mut record = Outer::default();
    match bind_record(&mut record, "app") {
        Ok(registry) => (record, registry),
        Err(err) => panic!("bind failed: {err}"),
    }
}

#[test]
fn leaves_are_registered_in_declaration_order() {
    let (_, registry) = bind_outer();
    let keys: Vec<&str> = registry.fields.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(
        keys,
        [
            "port",
            "host_name",
            "inner.level",
            "inner.verbose",
            "extra.level",
            "extra.verbose",
            "limit",
        ]
    );
}

#[rstest]
#[case("port", "APP_PORT", Some("port"))]
#[case("host_name", "APP_HOST", None)]
#[case("inner.level", "APP_INNER_LEVEL", Some("inner-level"))]
#[case("inner.verbose", "APP_INNER_VERBOSE", None)]
#[case("extra.level", "APP_EXTRA_LEVEL", Some("level"))]
#[case("limit", "APP_LIMIT", Some("limit"))]
fn each_leaf_gets_three_names(
    #[case] key: &str,
    #[case] env: &str,
    #[case] flag: Option<&str>,
) {
    let (_, registry) = bind_outer();
    let field = registry.fields.iter().find(|f| f.key == key);
    assert_eq!(field.map(|f| f.env_var.as_str()), Some(env));
    assert_eq!(
        field.and_then(|f| f.flag.as_ref()).map(|f| f.name.as_str()),
        flag
    );
}

#[test]
fn optional_values_are_allocated() {
    let (record, _) = bind_outer();
    assert!(record.extra.is_some());
    assert_eq!(record.limit, Some(0));
}

#[test]
fn shorthand_collision_is_rejected() {
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Leveled {
        level: String,
    }
    impl Bind for Leveled {
        fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
            fields.leaf(FieldDecl::new("level").flag("level", Some('l')), |l| &mut l.level)?;
            Ok(())
        }
    }
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Twice {
        a: Leveled,
        b: Leveled,
    }
    impl Bind for Twice {
        fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
            fields
                .record(FieldDecl::new("a").flag("a", None), |t| &mut t.a)?
                .record(FieldDecl::new("b").flag("b", None), |t| &mut t.b)?;
            Ok(())
        }
    }
    let err = bind_record(&mut Twice::default(), "").err();
    assert!(
        matches!(&err, Some(BindError::DuplicateShorthand { short: 'l', path, .. }) if path == "b.level"),
        "{err:?}"
    );
}

#[test]
fn duplicate_flag_names_are_rejected() {
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Clash {
        first: String,
        second: String,
    }
    impl Bind for Clash {
        fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
            fields
                .leaf(FieldDecl::new("first").flag("name", None), |c| &mut c.first)?
                .leaf(FieldDecl::new("second").flag("name", None), |c| &mut c.second)?;
            Ok(())
        }
    }
    let err = bind_record(&mut Clash::default(), "").err();
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("flag --name is already bound to \"first\""), "{message}");
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Opaque;

impl Leaf for Opaque {
    const KIND: ValueKind = ValueKind::Unsupported("unit struct");
}

#[test]
fn unsupported_kinds_name_their_path() {
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Holder {
        nested: Wrapper,
    }
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Wrapper {
        opaque: Opaque,
    }
    impl Bind for Wrapper {
        fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
            fields.leaf(FieldDecl::new("opaque"), |w| &mut w.opaque)?;
            Ok(())
        }
    }
    impl Bind for Holder {
        fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
            fields.record(FieldDecl::new("nested"), |h| &mut h.nested)?;
            Ok(())
        }
    }
    let err = bind_record(&mut Holder::default(), "").err();
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("\"nested.opaque\""), "{message}");
    assert!(message.contains("value cannot be bound"), "{message}");
}

#[test]
fn malformed_annotations_fail_with_the_field_path() {
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Bad {
        port: u16,
    }
    impl Bind for Bad {
        fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
            fields.leaf(
                FieldDecl::new("port").annotation("triconf:pflag a b c"),
                |b| &mut b.port,
            )?;
            Ok(())
        }
    }
    let err = bind_record(&mut Bad::default(), "").err();
    assert!(
        matches!(&err, Some(BindError::Annotation { path, .. }) if path == "port"),
        "{err:?}"
    );
}

#[test]
fn failed_visits_leave_the_path_balanced() {
    let depth = Cell::new(usize::MAX);
    let mut ctx = BindContext {
        path: FieldPath::new(),
        env_prefix: String::new(),
        registry: Registry::<Outer>::new(),
    };
    let mut record = Outer::default();
    let mut fields = Fields {
        ctx: &mut ctx,
        root: &mut record,
        access: identity(),
    };
    let result = fields.visit(FieldDecl::new("inner"), |f, _, _| {
        depth.set(f.ctx.path.depth());
        Err(BindError::Unbindable {
            type_name: "Outer",
            path: "inner".into(),
            kind: "test",
        })
    });
    assert!(result.is_err());
    assert_eq!(depth.get(), 1);
    assert_eq!(ctx.path.depth(), 0);
}

#[test]
fn appliers_assign_typed_values() {
    let (mut record, registry) = bind_outer();
    let apply = |key: &str, value: serde_json::Value, record: &mut Outer| {
        let field = registry.fields.iter().find(|f| f.key == key);
        field.map(|f| (f.apply)(record, value))
    };
    assert!(matches!(apply("port", json!(8080), &mut record), Some(Ok(()))));
    assert!(matches!(apply("inner.verbose", json!(true), &mut record), Some(Ok(()))));
    assert!(matches!(apply("extra.level", json!("debug"), &mut record), Some(Ok(()))));
    assert_eq!(record.port, 8080);
    assert!(record.inner.verbose);
    assert_eq!(record.extra.as_ref().map(|e| e.level.as_str()), Some("debug"));
    assert!(matches!(apply("port", json!(70000), &mut record), Some(Err(_))));
    assert_eq!(record.port, 8080);
}

#[test]
fn quoted_numbers_are_not_reparsed() {
    let (mut record, registry) = bind_outer();
    let port = registry.fields.iter().find(|f| f.key == "port");
    let result = port.map(|f| (f.apply)(&mut record, json!("8080")));
    assert!(matches!(result, Some(Err(ConversionError::Json { .. }))), "{result:?}");
    assert_eq!(record.port, 0);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Labelled {
    labels: std::collections::BTreeMap<String, u8>,
}

impl Bind for Labelled {
    fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
        fields.leaf(FieldDecl::new("labels"), |l| &mut l.labels)?;
        Ok(())
    }
}

#[test]
fn map_leaves_keep_unmentioned_keys() -> anyhow::Result<()> {
    let mut record = Labelled::default();
    record.labels.insert("a".into(), 1);
    let registry = bind_record(&mut record, "")?;
    let field = registry
        .fields
        .first()
        .ok_or_else(|| anyhow::anyhow!("labels not registered"))?;
    (field.apply)(&mut record, json!({"b": 2, "a": null}))?;
    anyhow::ensure!(
        record.labels == std::collections::BTreeMap::from([("a".to_owned(), 1), ("b".to_owned(), 2)]),
        "{:?}",
        record.labels
    );
    Ok(())
}

#[test]
fn readers_see_the_current_value() {
    let (mut record, registry) = bind_outer();
    record.inner.level = "warn".into();
    let value = registry
        .fields
        .iter()
        .find(|f| f.key == "inner.level")
        .and_then(|f| (f.read)(&mut record));
    assert_eq!(value, Some(json!("warn")));
}
