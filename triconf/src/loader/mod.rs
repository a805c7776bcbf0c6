//! Bind a record once, then load it repeatedly from file, environment and
//! flags.
//!
//! Values are merged with [`figment`] in precedence order: file, then
//! environment, then flags the user actually set. Text from the environment
//! and from flags is parsed by the leaf's kind on the way in; file values are
//! taken as written. Each bound leaf is then
//! fetched by its lookup key and assigned. Every loader runs even when an
//! earlier one fails; the record is only replaced when all of them succeed.

mod sources;

use clap::{Arg, ArgMatches, Command};
use figment::{Figment, Provider, providers::Serialized};
use parking_lot::{MappedRwLockReadGuard, Mutex, RwLock, RwLockReadGuard};

use crate::bind::{Bind, FieldBinding, Registry, bind_record};
use crate::error::{BindError, ConfigError, ConversionError, LoadError};
use crate::file::read_document;
use crate::flags::{changed_value, flag_arg, flag_command};
use crate::layer::TextLayer;
use crate::scalar::ValueKind;

pub use sources::Sources;

type Subscriber<R> = Box<dyn Fn(&R) + Send + Sync>;

struct Bound<R> {
    record: R,
    registry: Registry<R>,
    changed: Vec<(String, ValueKind, String)>,
}

/// Holds a bound record and reloads it on demand.
///
/// Reads share the lock; `load` holds it exclusively for its whole duration,
/// so readers never observe a partially loaded record.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use triconf::{Bind, BindError, FieldDecl, Fields, Loader, Sources};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct Config {
///     port: u16,
/// }
///
/// impl Bind for Config {
///     fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
///         fields.leaf(FieldDecl::new("port").flag("port", Some('p')), |c| &mut c.port)?;
///         Ok(())
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let loader = Loader::new(Sources::new());
/// loader.bind(Config::default())?;
/// loader.parse_flags(["--port", "8080"])?;
/// loader.load()?;
/// assert_eq!(loader.current().map(|c| c.port), Some(8080));
/// # Ok(())
/// # }
/// ```
pub struct Loader<R> {
    sources: Sources,
    state: RwLock<Option<Bound<R>>>,
    subscribers: Mutex<Vec<Subscriber<R>>>,
}

impl<R> Loader<R>
where
    R: Bind + Clone + Send + Sync,
{
    /// A loader with nothing bound yet.
    #[must_use]
    pub fn new(sources: Sources) -> Self {
        Self {
            sources,
            state: RwLock::new(None),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Bind `record` to this loader, replacing any previous binding.
    ///
    /// Optional nested values are allocated during the walk, so the stored
    /// record may differ from the one passed in.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] if any field cannot be registered; the
    /// previous binding is left in place.
    pub fn bind(&self, mut record: R) -> Result<(), BindError> {
        let registry = bind_record(&mut record, self.sources.prefix())?;
        tracing::debug!(
            type_name = registry.type_name,
            fields = registry.fields.len(),
            "bound record"
        );
        *self.state.write() = Some(Bound {
            record,
            registry,
            changed: Vec::new(),
        });
        Ok(())
    }

    /// Sources this loader reads.
    #[must_use]
    pub const fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Whether [`Loader::bind`] has succeeded.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.state.read().is_some()
    }

    /// One clap argument per registered flag, in registration order.
    #[must_use]
    pub fn flag_args(&self) -> Vec<Arg> {
        self.state.read().as_ref().map_or_else(Vec::new, |bound| {
            bound
                .registry
                .flags()
                .map(|(flag, kind)| flag_arg(&flag.name, flag.shorthand, kind, &flag.help))
                .collect()
        })
    }

    /// Standalone command accepting only the registered flags.
    #[must_use]
    pub fn command(&self) -> Command {
        flag_command(self.sources.name()).args(self.flag_args())
    }

    /// Add the registered flags to an application's own command.
    #[must_use]
    pub fn augment(&self, command: Command) -> Command {
        command.args(self.flag_args())
    }

    /// Parse `argv` (without the program name) and remember the flags that
    /// were set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Flags`] when clap rejects the arguments.
    pub fn parse_flags<I, T>(&self, argv: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = self
            .command()
            .try_get_matches_from(argv)
            .map_err(ConfigError::flags)?;
        self.set_matches(&matches);
        Ok(())
    }

    /// Remember the registered flags set in `matches`, e.g. from a command
    /// built with [`Loader::augment`].
    pub fn set_matches(&self, matches: &ArgMatches) {
        if let Some(bound) = self.state.write().as_mut() {
            bound.changed = bound
                .registry
                .fields
                .iter()
                .filter_map(|field| {
                    let flag = field.flag.as_ref()?;
                    changed_value(matches, &flag.name)
                        .map(|raw| (field.key.clone(), field.kind, raw))
                })
                .collect();
        }
    }

    /// Populate the bound record from every source.
    ///
    /// Subscribers run after the lock is released, with the new value.
    ///
    /// # Errors
    ///
    /// Returns every failure of this load. The record keeps its previous
    /// value when any loader fails.
    pub fn load(&self) -> Result<(), LoadError> {
        let published = {
            let mut state = self.state.write();
            let Some(bound) = state.as_mut() else {
                return Err(LoadError::single(ConfigError::Unbound));
            };
            let mut failures = Vec::new();
            let figment = self.gather(bound, &mut failures);
            let mut working = bound.record.clone();
            failures.extend(
                bound
                    .registry
                    .fields
                    .iter()
                    .filter_map(|field| load_field(&figment, field, &mut working).err()),
            );
            if let Some(err) = LoadError::try_from_failures(failures) {
                return Err(err);
            }
            bound.record = working;
            bound.record.clone()
        };
        self.notify(&published);
        Ok(())
    }

    /// Load again, keeping the previous value on failure.
    ///
    /// Returns whether the load succeeded.
    pub fn reload(&self) -> bool {
        match self.load() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "reload failed; keeping previous configuration");
                false
            }
        }
    }

    /// Borrow the current record.
    #[must_use]
    pub fn read(&self) -> Option<MappedRwLockReadGuard<'_, R>> {
        RwLockReadGuard::try_map(self.state.read(), |state| {
            state.as_ref().map(|bound| &bound.record)
        })
        .ok()
    }

    /// Clone of the current record.
    #[must_use]
    pub fn current(&self) -> Option<R> {
        self.read().map(|record| record.clone())
    }

    /// Call `callback` with the new value after every successful load.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        self.subscribers.lock().push(Box::new(callback));
    }

    /// `NAME=<kind>` for every bound environment variable.
    #[must_use]
    pub fn env_usage(&self) -> Vec<String> {
        self.state.read().as_ref().map_or_else(Vec::new, |bound| {
            bound
                .registry
                .fields
                .iter()
                .map(|field| format!("{}=<{}>", field.env_var, field.kind))
                .collect()
        })
    }

    /// Check every declared pattern against the current record.
    ///
    /// # Errors
    ///
    /// Returns one [`ConfigError::Validation`] per mismatch, or
    /// [`ConfigError::Unbound`].
    pub fn validate(&self) -> Result<(), LoadError> {
        let state = self.state.read();
        let Some(bound) = state.as_ref() else {
            return Err(LoadError::single(ConfigError::Unbound));
        };
        let mut record = bound.record.clone();
        let mut failures = Vec::new();
        for field in bound
            .registry
            .fields
            .iter()
            .filter(|f| !f.validations.is_empty())
        {
            let text = match (field.read)(&mut record) {
                Some(serde_json::Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => String::new(),
            };
            failures.extend(
                field
                    .validations
                    .iter()
                    .filter_map(|rule| rule.check(&field.key, &text).err()),
            );
        }
        LoadError::try_from_failures(failures).map_or(Ok(()), Err)
    }

    fn gather(&self, bound: &Bound<R>, failures: &mut Vec<ConfigError>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = self.sources.file_path() {
            match read_document(path) {
                Ok(document) => figment = figment.merge(Serialized::defaults(document)),
                Err(err) => failures.push(err),
            }
        }
        let env = TextLayer::from_env(
            bound
                .registry
                .fields
                .iter()
                .map(|f| (f.key.as_str(), f.kind, f.env_var.as_str())),
            failures,
        );
        let flags = TextLayer::parse(
            "flags",
            bound
                .changed
                .iter()
                .map(|(key, kind, raw)| (key.as_str(), *kind, raw.clone())),
            failures,
        );
        let figment = figment.merge(env).merge(flags);
        if let Err(err) = figment.data() {
            failures.push(ConfigError::gathering(err));
        }
        figment
    }

    fn notify(&self, record: &R) {
        for subscriber in self.subscribers.lock().iter() {
            subscriber(record);
        }
    }
}

fn load_field<R>(
    figment: &Figment,
    field: &FieldBinding<R>,
    record: &mut R,
) -> Result<(), ConfigError> {
    if !figment.contains(&field.key) {
        return Ok(());
    }
    let store = |err: figment::Error| {
        ConfigError::conversion(&field.key, ConversionError::Store(Box::new(err)))
    };
    let value: serde_json::Value = figment
        .find_value(&field.key)
        .map_err(store)?
        .deserialize()
        .map_err(store)?;
    if value.is_null() {
        return Ok(());
    }
    tracing::trace!(key = %field.key, "assigning value");
    (field.apply)(record, value).map_err(|source| ConfigError::conversion(&field.key, source))
}
