//! Writing artefacts and the post-generation format and fetch steps.

use std::collections::BTreeMap;
use std::io::Write;
use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};

use crate::error::GenerateError;

/// Write every artefact into `dir`, replacing existing files.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] naming the directory or file that failed.
pub fn write_artifacts(
    dir: &Utf8Path,
    artifacts: &BTreeMap<String, String>,
) -> Result<Vec<Utf8PathBuf>, GenerateError> {
    Dir::create_ambient_dir_all(dir, ambient_authority())
        .map_err(|err| GenerateError::io(dir, err))?;
    let handle = Dir::open_ambient_dir(dir, ambient_authority())
        .map_err(|err| GenerateError::io(dir, err))?;
    let mut written = Vec::with_capacity(artifacts.len());
    for (name, text) in artifacts {
        let path = dir.join(name);
        let mut file = handle
            .open_with(
                name,
                OpenOptions::new().write(true).create(true).truncate(true),
            )
            .map_err(|err| GenerateError::io(&path, err))?;
        file.write_all(text.as_bytes())
            .map_err(|err| GenerateError::io(&path, err))?;
        tracing::info!(path = %path, "wrote generated loader");
        written.push(path);
    }
    Ok(written)
}

/// Run `rustfmt` over `paths`.
///
/// # Errors
///
/// Returns [`GenerateError::Command`] when `rustfmt` exits unsuccessfully and
/// [`GenerateError::Io`] when it cannot be started.
pub fn format_files(paths: &[Utf8PathBuf]) -> Result<(), GenerateError> {
    if paths.is_empty() {
        return Ok(());
    }
    let mut command = Command::new("rustfmt");
    command.args(["--edition", "2024"]);
    command.args(paths.iter().map(|path| path.as_str()));
    run("rustfmt", &mut command, Utf8Path::new("rustfmt"))
}

/// Run `cargo fetch` in `dir` so dependencies of the generated code resolve.
///
/// # Errors
///
/// As [`format_files`].
pub fn fetch_dependencies(dir: &Utf8Path) -> Result<(), GenerateError> {
    let mut command = Command::new("cargo");
    command.arg("fetch").current_dir(dir);
    run("cargo fetch", &mut command, dir)
}

fn run(name: &str, command: &mut Command, context: &Utf8Path) -> Result<(), GenerateError> {
    tracing::debug!(command = name, "running post-generation step");
    let output = command
        .output()
        .map_err(|err| GenerateError::io(context, err))?;
    if output.status.success() {
        return Ok(());
    }
    Err(GenerateError::Command {
        command: name.to_owned(),
        status: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
    })
}
