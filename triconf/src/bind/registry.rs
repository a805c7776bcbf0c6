//! Output of a bind: one entry per leaf plus the flag-to-key map.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde_json::Value;

use crate::annotation::Validation;
use crate::error::{BindError, ConversionError};
use crate::scalar::ValueKind;

pub(crate) type Applier<R> =
    Arc<dyn Fn(&mut R, Value) -> Result<(), ConversionError> + Send + Sync>;
pub(crate) type Reader<R> = Arc<dyn Fn(&mut R) -> Option<Value> + Send + Sync>;

/// Flag registered for a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name, the `-`-joined alias chain.
    pub name: String,
    /// Optional shorthand.
    pub shorthand: Option<char>,
    /// Help text.
    pub help: String,
}

/// A registered leaf.
pub(crate) struct FieldBinding<R> {
    pub(crate) key: String,
    pub(crate) env_var: String,
    pub(crate) flag: Option<FlagSpec>,
    pub(crate) kind: ValueKind,
    pub(crate) validations: Vec<Validation>,
    pub(crate) apply: Applier<R>,
    pub(crate) read: Reader<R>,
}

/// Every leaf of a bound record, in registration order.
pub(crate) struct Registry<R> {
    pub(crate) type_name: &'static str,
    pub(crate) fields: Vec<FieldBinding<R>>,
    key_by_flag: BTreeMap<String, String>,
    shorthands: BTreeSet<char>,
}

impl<R> Registry<R> {
    pub(crate) fn new() -> Self {
        Self {
            type_name: std::any::type_name::<R>(),
            fields: Vec::new(),
            key_by_flag: BTreeMap::new(),
            shorthands: BTreeSet::new(),
        }
    }

    pub(crate) fn register(&mut self, binding: FieldBinding<R>) -> Result<(), BindError> {
        if let Some(flag) = &binding.flag {
            if let Some(existing) = self.key_by_flag.get(&flag.name) {
                return Err(BindError::DuplicateFlag {
                    type_name: self.type_name,
                    path: binding.key.clone(),
                    flag: flag.name.clone(),
                    existing: existing.clone(),
                });
            }
            if let Some(short) = flag.shorthand {
                if !self.shorthands.insert(short) {
                    return Err(BindError::DuplicateShorthand {
                        type_name: self.type_name,
                        path: binding.key.clone(),
                        short,
                    });
                }
            }
            self.key_by_flag
                .insert(flag.name.clone(), binding.key.clone());
        }
        tracing::debug!(
            key = %binding.key,
            env = %binding.env_var,
            flag = binding.flag.as_ref().map(|f| f.name.as_str()),
            kind = %binding.kind,
            "registered field"
        );
        self.fields.push(binding);
        Ok(())
    }

    pub(crate) fn flags(&self) -> impl Iterator<Item = (&FlagSpec, ValueKind)> {
        self.fields
            .iter()
            .filter_map(|f| f.flag.as_ref().map(|flag| (flag, f.kind)))
    }
}
