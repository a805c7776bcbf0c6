//! Schema extraction from annotated struct declarations.
//!
//! A declaration is annotated when one of its documentation lines carries
//! the `triconf:` prefix. Its fields, their annotations and, for fields whose
//! type is another struct of the same package, the nested fields are
//! collected into a [`Schema`] tree.

mod attrs;
mod package;

use quote::ToTokens;
use syn::{Fields, GenericArgument, Item, ItemStruct, PathArguments, Type, Visibility};
use triconf::GenerationOptions;

use crate::error::ExtractionError;

pub use package::{GENERATED_PREFIX, Package, SourceFile, TypeIndex, is_source_name};

/// How a scalar is parsed from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    /// `bool`, through the permissive boolean parser.
    Bool,
    /// Integer or float, through the shared number parser at the declared
    /// width.
    Number,
    /// Text converted with `From<String>`.
    Text,
}

/// Classification of a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A leaf the generated loader parses directly.
    Scalar(ScalarType),
    /// A struct of the same package, walked recursively.
    Record {
        /// Struct name.
        type_name: String,
        /// Its fields.
        fields: Vec<FieldSchema>,
    },
    /// `Option<T>`: allocated with `T`'s default before loading, then loaded
    /// as `T`.
    Optional {
        /// Classification of `T`.
        inner: Box<FieldType>,
        /// `T` rendered as tokens.
        inner_type: String,
    },
    /// `Vec` or a map: has a default but is loaded from files only.
    Collection,
    /// Anything else; loaded from files only.
    Other,
}

/// One extracted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Identifier as written, including any `r#`.
    pub name: String,
    /// Serialization name: the serde rename, else the identifier.
    pub lookup_key: String,
    /// Declared type rendered as tokens.
    pub declared_type: String,
    /// Classification of the declared type.
    pub kind: FieldType,
    /// Directive lines from the field's documentation.
    pub annotations: Vec<String>,
    /// Remaining documentation prose.
    pub doc: String,
}

/// An annotated record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Name of the annotated declaration.
    pub type_name: String,
    /// Type-level directive lines.
    pub annotations: Vec<String>,
    /// Options from the `generate` directive, defaulted when malformed.
    pub options: GenerationOptions,
    /// Fields in declaration order.
    pub fields: Vec<FieldSchema>,
}

const NUMBERS: &[&str] = &[
    "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "f32", "f64",
];
const TEXTS: &[&str] = &["String", "PathBuf", "SecretString"];
const COLLECTIONS: &[&str] = &["Vec", "HashMap", "BTreeMap"];

/// Extract every annotated declaration of `package`, in file then
/// declaration order.
///
/// # Errors
///
/// Returns [`ExtractionError::UnsupportedType`] when an annotated
/// declaration is not a struct with named fields, and
/// [`ExtractionError::Parse`] for malformed serde attributes.
pub fn extract(package: &Package) -> Result<Vec<Schema>, ExtractionError> {
    let index = package.type_index();
    package
        .items()
        .filter_map(|item| {
            let name = package::type_name(item)?;
            let lines = attrs::doc_lines(item_attrs(item));
            let (annotations, _) = attrs::split_doc(&lines);
            (!annotations.is_empty()).then_some((item, name, annotations))
        })
        .map(|(item, name, annotations)| extract_type(&index, item, name, annotations))
        .collect()
}

fn item_attrs(item: &Item) -> &[syn::Attribute] {
    match item {
        Item::Struct(s) => &s.attrs,
        Item::Enum(e) => &e.attrs,
        Item::Type(t) => &t.attrs,
        Item::Union(u) => &u.attrs,
        _ => &[],
    }
}

fn extract_type(
    index: &TypeIndex<'_>,
    item: &Item,
    type_name: String,
    annotations: Vec<String>,
) -> Result<Schema, ExtractionError> {
    let Some(record) = resolve_struct(index, item, &mut Vec::new()) else {
        return Err(ExtractionError::UnsupportedType {
            description: describe(index, item),
            name: type_name,
        });
    };
    let options = generation_options(&annotations);
    let mut visiting = vec![record.ident.to_string()];
    let fields = extract_fields(index, record, &mut visiting)?;
    tracing::debug!(type_name = %type_name, fields = fields.len(), "extracted schema");
    Ok(Schema {
        type_name,
        annotations,
        options,
        fields,
    })
}

fn generation_options(annotations: &[String]) -> GenerationOptions {
    annotations
        .iter()
        .find_map(|line| {
            let body = triconf::annotation::strip_prefix(line)?.trim_start();
            let rest = body.strip_prefix("generate")?;
            (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
        })
        .map(GenerationOptions::parse_lenient)
        .unwrap_or_default()
}

/// Follow aliases until a struct with named fields, or give up.
fn resolve_struct<'a>(
    index: &TypeIndex<'a>,
    item: &'a Item,
    seen: &mut Vec<String>,
) -> Option<&'a ItemStruct> {
    match item {
        Item::Struct(s) if matches!(s.fields, Fields::Named(_)) => Some(s),
        Item::Type(alias) => {
            let target = local_name(&alias.ty)?;
            if seen.contains(&target) {
                return None;
            }
            seen.push(target.clone());
            resolve_struct(index, index.get(&target)?, seen)
        }
        _ => None,
    }
}

fn describe(index: &TypeIndex<'_>, item: &Item) -> String {
    match item {
        Item::Struct(s) => match s.fields {
            Fields::Unnamed(_) => "a tuple struct".to_owned(),
            _ => "a unit struct".to_owned(),
        },
        Item::Enum(_) => "an enum".to_owned(),
        Item::Union(_) => "a union".to_owned(),
        Item::Type(alias) => {
            let target = alias.ty.to_token_stream().to_string();
            match local_name(&alias.ty).and_then(|name| index.get(&name)) {
                Some(next) if !std::ptr::eq(next, item) => {
                    format!("an alias of `{target}`, which is {}", describe_shallow(next))
                }
                _ => format!("an alias of `{target}`"),
            }
        }
        _ => "not a type".to_owned(),
    }
}

fn describe_shallow(item: &Item) -> &'static str {
    match item {
        Item::Struct(_) => "a struct without named fields",
        Item::Enum(_) => "an enum",
        Item::Union(_) => "a union",
        _ => "an alias",
    }
}

/// Last path segment when it carries no generics, e.g. `Database` for
/// `crate::settings::Database`.
fn local_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Paren(inner) => local_name(&inner.elem),
        Type::Group(inner) => local_name(&inner.elem),
        Type::Path(path) if path.qself.is_none() => {
            let last = path.path.segments.last()?;
            last.arguments.is_none().then(|| last.ident.to_string())
        }
        _ => None,
    }
}

fn extract_fields(
    index: &TypeIndex<'_>,
    record: &ItemStruct,
    visiting: &mut Vec<String>,
) -> Result<Vec<FieldSchema>, ExtractionError> {
    let Fields::Named(named) = &record.fields else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for field in named
        .named
        .iter()
        .filter(|f| !matches!(f.vis, Visibility::Inherited))
    {
        let Some(ident) = &field.ident else {
            continue;
        };
        let name = ident.to_string();
        let plain = name.strip_prefix("r#").unwrap_or(&name).to_owned();
        let rename = attrs::serde_rename(&field.attrs).map_err(|source| ExtractionError::Parse {
            path: format!("{}.{plain}", record.ident).into(),
            source,
        })?;
        let (annotations, doc) = attrs::split_doc(&attrs::doc_lines(&field.attrs));
        out.push(FieldSchema {
            lookup_key: rename.unwrap_or(plain),
            declared_type: field.ty.to_token_stream().to_string(),
            kind: classify(index, &field.ty, visiting)?,
            name,
            annotations,
            doc,
        });
    }
    Ok(out)
}

/// Last segment name of a generic type and its type argument when it has
/// exactly one, e.g. `("Option", Some(u16))` for `Option<u16>`.
fn generic_parts(ty: &Type) -> Option<(String, Option<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let last = path.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    let first = match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    };
    Some((last.ident.to_string(), first))
}

fn classify(
    index: &TypeIndex<'_>,
    ty: &Type,
    visiting: &mut Vec<String>,
) -> Result<FieldType, ExtractionError> {
    if let Some((generic, argument)) = generic_parts(ty) {
        return match (generic.as_str(), argument) {
            ("Option", Some(inner)) => classify_optional(index, inner, visiting),
            (name, _) if COLLECTIONS.contains(&name) => Ok(FieldType::Collection),
            _ => Ok(FieldType::Other),
        };
    }
    let Some(name) = local_name(ty) else {
        return Ok(FieldType::Other);
    };
    if name == "bool" {
        return Ok(FieldType::Scalar(ScalarType::Bool));
    }
    if NUMBERS.contains(&name.as_str()) {
        return Ok(FieldType::Scalar(ScalarType::Number));
    }
    if TEXTS.contains(&name.as_str()) {
        return Ok(FieldType::Scalar(ScalarType::Text));
    }
    // Recursive types cannot be flattened into a finite loader.
    if visiting.contains(&name) {
        return Ok(FieldType::Other);
    }
    let kind = match index.get(&name) {
        Some(Item::Type(alias)) => {
            visiting.push(name);
            let kind = classify(index, &alias.ty, visiting);
            visiting.pop();
            kind?
        }
        Some(item) => match resolve_struct(index, item, &mut Vec::new()) {
            Some(record) => {
                visiting.push(name);
                let fields = extract_fields(index, record, visiting);
                visiting.pop();
                FieldType::Record {
                    type_name: record.ident.to_string(),
                    fields: fields?,
                }
            }
            None => FieldType::Other,
        },
        None => FieldType::Other,
    };
    Ok(kind)
}

fn classify_optional(
    index: &TypeIndex<'_>,
    inner: &Type,
    visiting: &mut Vec<String>,
) -> Result<FieldType, ExtractionError> {
    let kind = match classify(index, inner, visiting)? {
        // Nested options and unknown types have no default to allocate.
        FieldType::Optional { .. } | FieldType::Other => FieldType::Other,
        kind => FieldType::Optional {
            inner: Box::new(kind),
            inner_type: inner.to_token_stream().to_string(),
        },
    };
    Ok(kind)
}
