//! JSON overlay shared by file loading in generated code and map leaves in
//! the binder.

use serde_json::{Map, Value};

/// Overlay `layer` onto `target`.
///
/// Objects merge key by key, recursively; `null` leaves the target
/// untouched; anything else replaces it.
pub(crate) fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => merge_object(target, map),
        Value::Null => {}
        _ => *target = layer,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Some(target_map) = target.as_object_mut() else {
        return;
    };
    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None if value.is_null() => {}
            None => {
                target_map.insert(key, value);
            }
        }
    }
}
