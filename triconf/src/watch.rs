//! Reload a [`Loader`] whenever its configuration file changes.

use std::sync::Arc;

use camino::Utf8Path;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher, recommended_watcher};

use crate::bind::Bind;
use crate::error::ConfigError;
use crate::loader::Loader;

/// Keeps the file watch alive; dropping it stops reloading.
#[must_use = "dropping the watcher stops reloading"]
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

/// Call [`Loader::reload`] each time the loader's file is written or
/// replaced.
///
/// The containing directory is watched so editors that save by renaming are
/// still seen.
///
/// # Errors
///
/// Returns [`ConfigError::File`] when the loader has no file or the watch
/// cannot be installed.
pub fn watch_file<R>(loader: Arc<Loader<R>>) -> Result<FileWatcher, ConfigError>
where
    R: Bind + Clone + Send + Sync,
{
    let Some(path) = loader.sources().file_path().map(Utf8Path::to_path_buf) else {
        return Err(ConfigError::invalid_data(
            Utf8Path::new(""),
            "no configuration file to watch",
        ));
    };
    let Some(name) = path.file_name().map(str::to_owned) else {
        return Err(ConfigError::invalid_data(&path, "path does not name a file"));
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8Path::new(".").to_path_buf(),
    };

    let mut watcher = recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if touches(&event, &name) => {
            tracing::debug!(kind = ?event.kind, "configuration file changed");
            loader.reload();
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "file watch error"),
    })
    .map_err(|err| ConfigError::file(&path, err))?;
    watcher
        .watch(dir.as_std_path(), RecursiveMode::NonRecursive)
        .map_err(|err| ConfigError::file(&path, err))?;
    tracing::debug!(path = %path, "watching configuration file");
    Ok(FileWatcher { _watcher: watcher })
}

fn touches(event: &Event, name: &str) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name().and_then(|n| n.to_str()) == Some(name))
}
