//! A package: the `.rs` files of one directory, parsed together.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use syn::Item;

use crate::error::{ExtractionError, GenerateError};

/// Prefix shared by every generated file name.
pub const GENERATED_PREFIX: &str = "zz_triconf_";

/// One parsed source file.
pub struct SourceFile {
    /// Path of the file.
    pub path: Utf8PathBuf,
    /// Parsed syntax tree.
    pub syntax: syn::File,
}

/// Source files of one directory, sorted by name.
pub struct Package {
    dir: Utf8PathBuf,
    files: Vec<SourceFile>,
}

impl Package {
    /// Parse in-memory sources as the package rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Parse`] for the first file that is not
    /// valid Rust.
    pub fn from_sources<I>(dir: &Utf8Path, sources: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = (Utf8PathBuf, String)>,
    {
        let mut files = sources
            .into_iter()
            .map(|(path, text)| match syn::parse_file(&text) {
                Ok(syntax) => Ok(SourceFile { path, syntax }),
                Err(source) => Err(ExtractionError::Parse { path, source }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Read and parse every non-generated `.rs` file directly inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Io`] when the directory or a file cannot be
    /// read, and [`GenerateError::Extraction`] when a file does not parse.
    pub fn read(dir: &Utf8Path) -> Result<Self, GenerateError> {
        let handle = Dir::open_ambient_dir(dir, ambient_authority())
            .map_err(|err| GenerateError::io(dir, err))?;
        let mut sources = Vec::new();
        for entry in handle.entries().map_err(|err| GenerateError::io(dir, err))? {
            let entry = entry.map_err(|err| GenerateError::io(dir, err))?;
            let name = entry.file_name().map_err(|err| GenerateError::io(dir, err))?;
            if !is_source_name(&name) {
                continue;
            }
            if !entry
                .file_type()
                .map_err(|err| GenerateError::io(dir.join(&name), err))?
                .is_file()
            {
                continue;
            }
            let text = handle
                .read_to_string(&name)
                .map_err(|err| GenerateError::io(dir.join(&name), err))?;
            sources.push((dir.join(&name), text));
        }
        Ok(Self::from_sources(dir, sources)?)
    }

    /// Directory the package lives in.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Parsed files.
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Top-level items of every file, in file then declaration order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.files.iter().flat_map(|file| file.syntax.items.iter())
    }

    /// Named type declarations, for resolving field types.
    #[must_use]
    pub fn type_index(&self) -> TypeIndex<'_> {
        let mut types = BTreeMap::new();
        for item in self.items() {
            if let Some(name) = type_name(item) {
                types.entry(name).or_insert(item);
            }
        }
        TypeIndex { types }
    }
}

/// Whether `name` is a hand-written Rust source file.
#[must_use]
pub fn is_source_name(name: &str) -> bool {
    Utf8Path::new(name).extension() == Some("rs") && !name.starts_with(GENERATED_PREFIX)
}

/// Name of a type-declaring item.
pub(crate) fn type_name(item: &Item) -> Option<String> {
    match item {
        Item::Struct(s) => Some(s.ident.to_string()),
        Item::Enum(e) => Some(e.ident.to_string()),
        Item::Type(t) => Some(t.ident.to_string()),
        Item::Union(u) => Some(u.ident.to_string()),
        _ => None,
    }
}

/// Type declarations of a package by name.
pub struct TypeIndex<'a> {
    types: BTreeMap<String, &'a Item>,
}

impl<'a> TypeIndex<'a> {
    /// Look up a declaration.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a Item> {
        self.types.get(name).copied()
    }
}
