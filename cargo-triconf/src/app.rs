//! The generator pipeline: find packages, extract, render, write.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::GenerateError;
use crate::output;
use crate::render;
use crate::schema::{self, Package};

/// Pipeline settings.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory to scan.
    pub root: Utf8PathBuf,
    /// Render without writing anything.
    pub is_dry_run: bool,
    /// Run `rustfmt` on written files.
    pub should_format: bool,
    /// Run `cargo fetch` in each written package.
    pub should_fetch: bool,
}

/// What one package produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutput {
    /// Package directory.
    pub dir: Utf8PathBuf,
    /// Rendered units by file name.
    pub artifacts: BTreeMap<String, String>,
}

/// Every directory under `root`, `root` included, sorted by path.
///
/// `target` and hidden directories are skipped.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] when a directory cannot be listed.
pub fn package_dirs(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, GenerateError> {
    let mut dirs = vec![root.to_path_buf()];
    let mut pending = vec![root.to_path_buf()];
    while let Some(current) = pending.pop() {
        let handle = Dir::open_ambient_dir(&current, ambient_authority())
            .map_err(|err| GenerateError::io(&current, err))?;
        for entry in handle
            .entries()
            .map_err(|err| GenerateError::io(&current, err))?
        {
            let entry = entry.map_err(|err| GenerateError::io(&current, err))?;
            let name = entry
                .file_name()
                .map_err(|err| GenerateError::io(&current, err))?;
            if name == "target" || name.starts_with('.') {
                continue;
            }
            let is_dir = entry
                .file_type()
                .map_err(|err| GenerateError::io(current.join(&name), err))?
                .is_dir();
            if is_dir {
                dirs.push(current.join(&name));
                pending.push(current.join(&name));
            }
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Extract and render the annotated types of the package in `dir`.
///
/// # Errors
///
/// Propagates read and extraction failures.
pub fn render_package(dir: &Utf8Path) -> Result<BTreeMap<String, String>, GenerateError> {
    let package = Package::read(dir)?;
    let schemas = schema::extract(&package)?;
    if !schemas.is_empty() {
        tracing::debug!(
            dir = %package.dir(),
            files = package.files().len(),
            types = schemas.len(),
            "found annotated types"
        );
    }
    Ok(render::artifacts_for(&schemas))
}

/// Run the pipeline over every package under `options.root`.
///
/// Packages are processed one at a time; the first failure aborts the run.
///
/// # Errors
///
/// Returns the first [`GenerateError`] encountered.
pub fn run(options: &Options) -> Result<Vec<PackageOutput>, GenerateError> {
    let mut outputs = Vec::new();
    for dir in package_dirs(&options.root)? {
        let artifacts = render_package(&dir)?;
        if artifacts.is_empty() {
            continue;
        }
        if !options.is_dry_run {
            let written = output::write_artifacts(&dir, &artifacts)?;
            if options.should_format {
                output::format_files(&written)?;
            }
            if options.should_fetch {
                output::fetch_dependencies(&dir)?;
            }
        }
        outputs.push(PackageOutput { dir, artifacts });
    }
    tracing::info!(packages = outputs.len(), "generation finished");
    Ok(outputs)
}
