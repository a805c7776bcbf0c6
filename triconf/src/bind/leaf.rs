//! Field types the binder can load directly.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::scalar::ValueKind;
use crate::secret::SecretString;

/// A field loaded as one value from the merged store.
///
/// Implementations exist for booleans, every integer and float width,
/// strings, paths, `Vec`, string-keyed maps and `Option` of any of these.
/// Implementing `Leaf` with [`ValueKind::Unsupported`] makes binding fail with
/// a descriptive error instead of silently skipping the field.
pub trait Leaf: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Kind used to parse textual sources and to shape the flag.
    const KIND: ValueKind;

    /// Prepare the in-memory value before its loader is registered.
    fn prepare(&mut self) {}
}

#[cfg(target_pointer_width = "32")]
const POINTER_BITS: u8 = 32;
#[cfg(not(target_pointer_width = "32"))]
const POINTER_BITS: u8 = 64;

macro_rules! leaf_kind {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(impl Leaf for $ty {
            const KIND: ValueKind = $kind;
        })*
    };
}

leaf_kind! {
    bool => ValueKind::Bool,
    i8 => ValueKind::Int { bits: 8, signed: true },
    i16 => ValueKind::Int { bits: 16, signed: true },
    i32 => ValueKind::Int { bits: 32, signed: true },
    i64 => ValueKind::Int { bits: 64, signed: true },
    isize => ValueKind::Int { bits: POINTER_BITS, signed: true },
    u8 => ValueKind::Int { bits: 8, signed: false },
    u16 => ValueKind::Int { bits: 16, signed: false },
    u32 => ValueKind::Int { bits: 32, signed: false },
    u64 => ValueKind::Int { bits: 64, signed: false },
    usize => ValueKind::Int { bits: POINTER_BITS, signed: false },
    f32 => ValueKind::Float { bits: 32 },
    f64 => ValueKind::Float { bits: 64 },
    String => ValueKind::String,
    PathBuf => ValueKind::String,
    SecretString => ValueKind::String,
}

impl<T> Leaf for Vec<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    const KIND: ValueKind = ValueKind::List;
}

impl<T, const N: usize> Leaf for [T; N]
where
    T: Send + Sync + 'static,
    [T; N]: Serialize + DeserializeOwned,
{
    const KIND: ValueKind = ValueKind::List;
}

impl<V> Leaf for BTreeMap<String, V>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    const KIND: ValueKind = ValueKind::Map;
}

impl<V, S> Leaf for HashMap<String, V, S>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    const KIND: ValueKind = ValueKind::Map;
}

/// Optional leaves are allocated with the inner default before loading, so
/// code reading the record never has to handle `None` for a bound field.
impl<T> Leaf for Option<T>
where
    T: Leaf + Default,
{
    const KIND: ValueKind = T::KIND;

    fn prepare(&mut self) {
        if self.is_none() {
            *self = Some(T::default());
        }
    }
}
