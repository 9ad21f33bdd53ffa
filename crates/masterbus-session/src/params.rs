//! Flat parameter capture and restore.
//!
//! A [`ParamMap`] is the persisted shape of the whole chain: one
//! `string_id -> raw value` entry per parameter, captured through the
//! [`ParameterInfo`] trait. Both engines share the map; their string IDs
//! are prefixed (`eq_`, `comp_`) so keys never collide.

use std::collections::BTreeMap;

use masterbus_core::ParameterInfo;
use serde::{Deserialize, Serialize};

/// A flat `parameter string ID -> raw value` snapshot.
///
/// Values are the raw (denormalized) parameter values, exactly as
/// `get_param` returns them. BTreeMap keeps serialized files in a
/// stable key order, so saving the same state twice produces identical
/// bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap {
    values: BTreeMap<String, f32>,
}

impl ParamMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures every parameter of `engine` into a fresh map.
    pub fn capture<P: ParameterInfo>(engine: &P) -> Self {
        let mut map = Self::new();
        map.extend_from(engine);
        map
    }

    /// Adds every parameter of `engine` to this map.
    ///
    /// Parameters without a string ID are skipped; they have no stable
    /// key to persist under.
    pub fn extend_from<P: ParameterInfo>(&mut self, engine: &P) {
        for i in 0..engine.param_count() {
            if let Some(desc) = engine.param_info(i)
                && !desc.string_id.is_empty()
            {
                self.values
                    .insert(desc.string_id.to_string(), engine.get_param(i));
            }
        }
    }

    /// Writes every matching entry into `engine`, returning how many
    /// parameters were applied.
    ///
    /// Keys the engine does not recognize are left alone, so one map
    /// can hold the whole chain and each engine takes only its own
    /// entries. Unknown keys in a loaded file are tolerated the same
    /// way.
    pub fn apply_to<P: ParameterInfo>(&self, engine: &mut P) -> usize {
        let mut applied = 0;
        for (key, &value) in &self.values {
            if let Some(index) = engine.param_index_by_string_id(key) {
                engine.set_param(index, value);
                applied += 1;
            }
        }
        applied
    }

    /// Looks up a single value by string ID.
    pub fn get(&self, string_id: &str) -> Option<f32> {
        self.values.get(string_id).copied()
    }

    /// Inserts or overwrites a single value.
    pub fn insert(&mut self, string_id: impl Into<String>, value: f32) {
        self.values.insert(string_id.into(), value);
    }

    /// Number of stored parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(string_id, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }
}
