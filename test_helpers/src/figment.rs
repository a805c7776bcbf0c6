//! Running test bodies inside a [`figment::Jail`].

use anyhow::{Result, anyhow};
use figment::Jail;

/// Run `f` in a fresh jail: a temporary working directory whose environment
/// changes are undone afterwards.
///
/// The closure returns an [`anyhow::Result`], so jail calls (`create_file`)
/// and crate calls both propagate with `?`, and `ensure!` works inside it.
///
/// # Errors
///
/// Returns the closure's error, or an error when the jail cannot be set up.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut Jail) -> Result<T>,
{
    let mut outcome = None;
    Jail::try_with(|jail| {
        outcome = Some(f(jail));
        Ok(())
    })
    .map_err(|err| anyhow!("cannot set up jail: {err}"))?;
    outcome.unwrap_or_else(|| Err(anyhow!("jail closure did not run")))
}
