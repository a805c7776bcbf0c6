//! Fixed source templates.

use super::HEADER;
use super::plan::{LeafPlan, LoadPlan};
use crate::schema::{ScalarType, Schema};

pub(super) fn utils() -> String {
    format!(
        concat!(
            "{header}\n",
            "// Shared by the triconf loaders of this module.\n",
            "\n",
            "/// Configuration sources of one generated loader.\n",
            "struct TriconfSources {{\n",
            "    /// Configuration file, empty when none.\n",
            "    filename: &'static str,\n",
            "    /// Normalized environment prefix.\n",
            "    env_prefix: &'static str,\n",
            "}}\n",
            "\n",
            "/// Overlays a parsed configuration file onto a record through its serde form.\n",
            "struct TriconfJson<'a, T>(&'a mut T);\n",
            "\n",
            "impl<T> TriconfJson<'_, T>\n",
            "where\n",
            "    T: ::triconf::generated::Serialize + ::triconf::generated::DeserializeOwned,\n",
            "{{\n",
            "    fn overlay(\n",
            "        self,\n",
            "        document: ::triconf::generated::Document,\n",
            "        filename: &str,\n",
            "    ) -> Result<(), ::triconf::ConfigError> {{\n",
            "        ::triconf::generated::overlay(self.0, document, filename)\n",
            "    }}\n",
            "}}\n",
        ),
        header = HEADER,
    )
}

pub(super) fn loader(schema: &Schema, plan: &LoadPlan) -> String {
    let mut out = format!(
        concat!(
            "{header}\n",
            "// Loader for `{ty}`.\n",
            "\n",
            "impl {ty} {{\n",
            "    /// Load `{ty}` from its configuration file, the environment and `argv`,\n",
            "    /// later sources overriding earlier ones.\n",
            "    ///\n",
            "    /// Fields no source mentions keep their current value.\n",
            "    ///\n",
            "    /// # Errors\n",
            "    ///\n",
            "    /// Returns the first failure. Fields assigned before it keep their new\n",
            "    /// values.\n",
            "    pub fn triconf_load<I, A>(&mut self, argv: I) -> Result<(), ::triconf::ConfigError>\n",
            "    where\n",
            "        I: IntoIterator<Item = A>,\n",
            "        A: Into<::std::ffi::OsString>,\n",
            "    {{\n",
            "        const SOURCES: TriconfSources = TriconfSources {{\n",
            "            filename: {filename:?},\n",
            "            env_prefix: {prefix:?},\n",
            "        }};\n",
            "{allocations}",
            "        if let Some(document) = ::triconf::generated::read_file(SOURCES.filename)? {{\n",
            "            TriconfJson(&mut *self).overlay(document, SOURCES.filename)?;\n",
            "        }}\n",
            "        self.triconf_load_env(SOURCES.env_prefix)?;\n",
            "        self.triconf_parse_flags(argv)\n",
            "    }}\n",
        ),
        header = HEADER,
        ty = schema.type_name,
        filename = schema.options.filename,
        prefix = triconf::normalize_prefix(&schema.options.env_prefix),
        allocations = allocations(plan),
    );
    out.push('\n');
    out.push_str(&env_phase(plan));
    out.push('\n');
    out.push_str(&flag_phase(&schema.type_name, plan));
    out.push_str("}\n");
    out
}

/// Optional fields start out allocated, as the binder leaves them.
fn allocations(plan: &LoadPlan) -> String {
    plan.allocations
        .iter()
        .map(|access| format!("        self.{access}.get_or_insert_with(Default::default);\n"))
        .collect()
}

fn env_phase(plan: &LoadPlan) -> String {
    let prefix = if plan.leaves.is_empty() {
        "_prefix"
    } else {
        "prefix"
    };
    let mut out = format!(
        "    fn triconf_load_env(&mut self, {prefix}: &str) -> Result<(), ::triconf::ConfigError> {{\n"
    );
    for leaf in &plan.leaves {
        out.push_str(&format!(
            concat!(
                "        {{\n",
                "            let var = format!(\"{{prefix}}{suffix}\");\n",
                "            if let Some(raw) = ::triconf::generated::env_value(&var) {{\n",
                "{assign}",
                "            }}\n",
                "        }}\n",
            ),
            suffix = leaf.env_suffix,
            assign = assignment(
                leaf,
                &format!(
                    "::triconf::ConfigError::env_parse(&var, {key:?}, {ty:?}, err)",
                    key = leaf.lookup_key,
                    ty = leaf.declared_type,
                ),
                16,
            ),
        ));
    }
    out.push_str(&skipped_comments(plan));
    out.push_str("        Ok(())\n    }\n");
    out
}

fn flag_phase(type_name: &str, plan: &LoadPlan) -> String {
    let mut out = String::from(concat!(
        "    fn triconf_parse_flags<I, A>(&mut self, argv: I) -> Result<(), ::triconf::ConfigError>\n",
        "    where\n",
        "        I: IntoIterator<Item = A>,\n",
        "        A: Into<::std::ffi::OsString>,\n",
        "    {\n",
        "        let args: Vec<::std::ffi::OsString> = argv.into_iter().map(Into::into).collect();\n",
        "        if args.is_empty() {\n",
        "            return Ok(());\n",
        "        }\n",
    ));
    let has_flags = plan.flagged().next().is_some();
    out.push_str(if has_flags {
        "        let matches = "
    } else {
        "        "
    });
    out.push_str(&format!(
        "::triconf::generated::flag_command({type_name:?})\n"
    ));
    for (leaf, name, short) in plan.flagged() {
        out.push_str(&format!(
            "            .arg(::triconf::generated::flag_arg({name:?}, {short}, <{ty} as ::triconf::Leaf>::KIND, {help:?}))\n",
            short = short.map_or_else(|| "None".to_owned(), |c| format!("Some({c:?})")),
            ty = leaf.declared_type,
            help = leaf.help,
        ));
    }
    out.push_str(concat!(
        "            .try_get_matches_from(args)\n",
        "            .map_err(::triconf::ConfigError::flags)?;\n",
    ));
    for (leaf, name, _) in plan.flagged() {
        out.push_str(&format!(
            concat!(
                "        if let Some(raw) = ::triconf::generated::changed_value(&matches, {name:?}) {{\n",
                "{assign}",
                "        }}\n",
            ),
            name = name,
            assign = assignment(
                leaf,
                &format!(
                    "::triconf::ConfigError::flag_value({name:?}, {key:?}, {ty:?}, err)",
                    key = leaf.lookup_key,
                    ty = leaf.declared_type,
                ),
                12,
            ),
        ));
    }
    out.push_str("        Ok(())\n    }\n");
    out
}

/// Statement assigning the parsed `raw` to the leaf, each line indented by
/// `indent` spaces.
fn assignment(leaf: &LeafPlan, error: &str, indent: usize) -> String {
    let access = &leaf.access;
    let wrap = if leaf.optional { "    .map(Some)" } else { "" };
    let lines = match leaf.scalar {
        ScalarType::Text if leaf.optional => vec![format!("self.{access} = Some(From::from(raw));")],
        ScalarType::Text => vec![format!("self.{access} = From::from(raw);")],
        ScalarType::Bool => vec![
            format!("self.{access} = ::triconf::generated::parse_bool(&raw)"),
            wrap.to_owned(),
            format!("    .map_err(|err| {error})?;"),
        ],
        ScalarType::Number => vec![
            format!(
                "self.{access} = ::triconf::generated::parse_number::<{}>(&raw)",
                leaf.parse_type
            ),
            wrap.to_owned(),
            format!("    .map_err(|err| {error})?;"),
        ],
    };
    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .map(|line| format!("{:indent$}{line}\n", ""))
        .collect()
}

fn skipped_comments(plan: &LoadPlan) -> String {
    plan.skipped
        .iter()
        .map(|(path, ty)| format!("        // {path}: {ty} is not a valid type for code generation\n"))
        .collect()
}
