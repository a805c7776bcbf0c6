//! Loader source rendering.
//!
//! Each package receives one shared utilities unit plus one unit per annotated
//! type. The units are meant to be pulled into the module that declares the
//! types, either by writing them next to the sources or with `include!`.

mod plan;
mod template;

use std::collections::BTreeMap;

use crate::schema::{GENERATED_PREFIX, Schema};

pub use plan::{LeafPlan, LoadPlan};

/// First line of every generated file.
pub const HEADER: &str = "// GENERATED FILE DO NOT EDIT";

/// File name of the per-package utilities unit.
#[must_use]
pub fn utils_file_name() -> String {
    format!("{GENERATED_PREFIX}utils.rs")
}

/// File name of the loader unit for `type_name`.
///
/// # Examples
///
/// ```
/// assert_eq!(cargo_triconf::render::type_file_name("AppConfig"), "zz_triconf_app_config.rs");
/// ```
#[must_use]
pub fn type_file_name(type_name: &str) -> String {
    format!(
        "{GENERATED_PREFIX}{}.rs",
        triconf::env_suffix(type_name).to_ascii_lowercase()
    )
}

/// Render the utilities unit shared by every loader of a package.
#[must_use]
pub fn render_utils() -> String {
    template::utils()
}

/// Render the loader unit for one annotated type.
#[must_use]
pub fn render_type(schema: &Schema) -> String {
    template::loader(schema, &LoadPlan::new(schema))
}

/// Every artefact for the annotated types of one package, keyed by file name.
///
/// A package without annotated types produces nothing.
#[must_use]
pub fn artifacts_for(schemas: &[Schema]) -> BTreeMap<String, String> {
    let mut artifacts = BTreeMap::new();
    if schemas.is_empty() {
        return artifacts;
    }
    artifacts.insert(utils_file_name(), render_utils());
    for schema in schemas {
        artifacts.insert(type_file_name(&schema.type_name), render_type(schema));
    }
    artifacts
}
