//! Helpers for safely mutating environment variables in tests.
//!
//! Each mutation takes a global re-entrant mutex and returns an RAII guard
//! that restores the previous state when dropped, removing the variable if it
//! was absent. Guards for the same key restore in LIFO order.
//!
//! # Examples
//!
//! ```
//! use triconf_test_helpers::env;
//!
//! let _g = env::set_var("TRICONF_DOC_KEY", "VALUE");
//! assert_eq!(std::env::var("TRICONF_DOC_KEY").ok().as_deref(), Some("VALUE"));
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
#[derive(Debug)]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

/// RAII guard that serialises environment access for its lifetime.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

fn mutate<F>(key: String, mutator: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// Sets an environment variable and returns a guard restoring its prior value.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: every mutation made through this module holds `ENV_MUTEX`.
    mutate(key.into(), |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Removes an environment variable and returns a guard restoring its prior value.
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    // SAFETY: every mutation made through this module holds `ENV_MUTEX`.
    mutate(key.into(), |k| unsafe { env::remove_var(k) })
}

/// Hold the environment lock across several operations.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        _guard: ENV_MUTEX.lock(),
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: guarded by `ENV_MUTEX`.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: guarded by `ENV_MUTEX`.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}
