//! Deterministic layer merging
//!
//! Layers are folded left to right, later layers taking precedence:
//! - mapping vs mapping merges recursively
//! - sequence vs sequence appends the later items not already present
//! - anything else (scalars, shape mismatches) is replaced by the later value
//!
//! Keys keep the position where they first appeared, so merging identical
//! inputs always yields identical output.

use serde_json::Value;

use super::layer::Mapping;

/// Merge layers in increasing order of precedence
pub fn merge<'a, I>(layers: I) -> Mapping
where
    I: IntoIterator<Item = &'a Mapping>,
{
    let mut merged = Mapping::new();
    for layer in layers {
        merge_into(&mut merged, layer);
    }
    merged
}

/// Merge `overlay` on top of `base` in place
pub fn merge_into(base: &mut Mapping, overlay: &Mapping) {
    for (key, value) in overlay {
        match base.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_value(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => merge_into(base_map, overlay_map),
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            for item in overlay_items {
                if !base_items.contains(item) {
                    base_items.push(item.clone());
                }
            }
        }
        (slot, overlay_value) => *slot = overlay_value.clone(),
    }
}
