//! Flatten a schema tree into the assignments a loader performs.

use std::collections::BTreeSet;

use triconf::annotation::FieldOptions;
use triconf::{FieldNames, FieldPath};

use crate::schema::{FieldSchema, FieldType, ScalarType, Schema};

/// One scalar field reachable from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafPlan {
    /// Rust place expression relative to `self`, e.g. `db.url`.
    pub access: String,
    /// Dotted lookup key.
    pub lookup_key: String,
    /// Environment suffix appended to the prefix.
    pub env_suffix: String,
    /// Flag name and shorthand, when the field declares an alias.
    pub flag: Option<(String, Option<char>)>,
    /// Help text for the flag.
    pub help: String,
    /// Declared type tokens.
    pub declared_type: String,
    /// Type the text is parsed as: the declared type, or `T` for `Option<T>`.
    pub parse_type: String,
    /// Whether the parsed value is wrapped in `Some`.
    pub optional: bool,
    /// Parser selection.
    pub scalar: ScalarType,
}

/// Assignments and skipped fields of one annotated type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadPlan {
    /// Place expressions of `Option` fields set to `Some(Default::default())`
    /// before any source is read, parents first.
    pub allocations: Vec<String>,
    /// Leaves in declaration order.
    pub leaves: Vec<LeafPlan>,
    /// Dotted paths and types of fields no phase but the file can set.
    pub skipped: Vec<(String, String)>,
}

impl LoadPlan {
    /// Build the plan for `schema`.
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        let mut plan = Self::default();
        let mut walk = Walk {
            path: FieldPath::new(),
            access: Vec::new(),
            flags: BTreeSet::new(),
            shorthands: BTreeSet::new(),
        };
        walk.fields(&schema.type_name, &schema.fields, &mut plan);
        plan
    }

    /// Leaves that surface as flags.
    pub fn flagged(&self) -> impl Iterator<Item = (&LeafPlan, &str, Option<char>)> {
        self.leaves.iter().filter_map(|leaf| {
            leaf.flag
                .as_ref()
                .map(|(name, short)| (leaf, name.as_str(), *short))
        })
    }
}

/// How a leaf's text becomes its value.
#[derive(Clone, Copy)]
struct Parse<'a> {
    scalar: ScalarType,
    ty: &'a str,
    optional: bool,
}

struct Walk {
    path: FieldPath,
    access: Vec<String>,
    flags: BTreeSet<String>,
    shorthands: BTreeSet<char>,
}

impl Walk {
    fn fields(&mut self, type_name: &str, fields: &[FieldSchema], plan: &mut LoadPlan) {
        for field in fields {
            let (options, errors) = FieldOptions::from_annotations(&field.annotations);
            for err in errors {
                tracing::warn!(
                    type_name,
                    field = %field.name,
                    error = %err,
                    "ignoring malformed field annotation"
                );
            }
            let alias = options.flag.as_ref().map(|f| f.name.as_str());
            let names = FieldNames::new(&field.name, Some(&field.lookup_key), alias);
            self.access.push(field.name.clone());
            self.path.push(names);
            self.field(type_name, field, &options, plan);
            self.path.pop();
            self.access.pop();
        }
    }

    fn field(
        &mut self,
        type_name: &str,
        field: &FieldSchema,
        options: &FieldOptions,
        plan: &mut LoadPlan,
    ) {
        match &field.kind {
            FieldType::Record {
                type_name: nested,
                fields,
            } => self.fields(nested, fields, plan),
            FieldType::Optional { inner, inner_type } => {
                plan.allocations.push(self.access.join("."));
                match inner.as_ref() {
                    FieldType::Record {
                        type_name: nested,
                        fields,
                    } => {
                        if let Some(segment) = self.access.last_mut() {
                            segment.push_str(".get_or_insert_with(Default::default)");
                        }
                        self.fields(nested, fields, plan);
                    }
                    FieldType::Scalar(scalar) => {
                        self.leaf(
                            type_name,
                            field,
                            options,
                            Parse {
                                scalar: *scalar,
                                ty: inner_type,
                                optional: true,
                            },
                            plan,
                        );
                    }
                    _ => self.skip(field, plan),
                }
            }
            FieldType::Collection | FieldType::Other => self.skip(field, plan),
            FieldType::Scalar(scalar) => {
                self.leaf(
                    type_name,
                    field,
                    options,
                    Parse {
                        scalar: *scalar,
                        ty: &field.declared_type,
                        optional: false,
                    },
                    plan,
                );
            }
        }
    }

    fn skip(&self, field: &FieldSchema, plan: &mut LoadPlan) {
        plan.skipped
            .push((self.path.lookup_key(), field.declared_type.clone()));
    }

    fn leaf(
        &mut self,
        type_name: &str,
        field: &FieldSchema,
        options: &FieldOptions,
        parse: Parse<'_>,
        plan: &mut LoadPlan,
    ) {
        let flag = options
            .flag
            .as_ref()
            .and_then(|alias| self.claim_flag(type_name, alias.shorthand));
        plan.leaves.push(LeafPlan {
            access: self.access.join("."),
            lookup_key: self.path.lookup_key(),
            env_suffix: self.path.env_var(""),
            flag,
            help: field.doc.clone(),
            declared_type: field.declared_type.clone(),
            parse_type: parse.ty.to_owned(),
            optional: parse.optional,
            scalar: parse.scalar,
        });
    }

    fn claim_flag(
        &mut self,
        type_name: &str,
        shorthand: Option<char>,
    ) -> Option<(String, Option<char>)> {
        let name = self.path.flag_key()?;
        if !self.flags.insert(name.clone()) {
            tracing::warn!(type_name, flag = %name, "skipping duplicate flag");
            return None;
        }
        let short = shorthand.filter(|c| {
            let fresh = self.shorthands.insert(*c);
            if !fresh {
                tracing::warn!(type_name, flag = %name, shorthand = %c, "dropping duplicate shorthand");
            }
            fresh
        });
        Some((name, short))
    }
}
