//! Form model types stored in a slice
//!
//! A slice maps field keys to [`FieldState`]s. The controller only reads the
//! `value` of each state; everything else belongs to the renderer and the
//! validators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::ValidationResult;

/// Raw field values as supplied by the host (not wrapped in [`FieldState`])
pub type RawModel = Map<String, Value>;

/// Submitted payload: raw values of every field whose value is truthy
pub type CleanModel = Map<String, Value>;

/// Returns `false` for `null`, `false`, zero, and the empty string.
///
/// Arrays and objects are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Per-field state kept in the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Renderer-specific keys the controller does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldState {
    /// Wrap a raw value with no validation state
    pub fn wrap(value: Value) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Merge a validation result into this state.
    ///
    /// The value is only replaced when the result carries one.
    pub fn apply(&mut self, result: ValidationResult) {
        if let Some(value) = result.value {
            self.value = value;
        }
        self.valid = Some(result.valid);
        self.dirty = Some(result.dirty);
        self.message = result.message;
    }

    /// Whether a validator has marked this field invalid
    pub fn is_invalid(&self) -> bool {
        self.valid == Some(false)
    }

    /// Whether the field should be highlighted as an error
    pub fn shows_error(&self) -> bool {
        self.is_invalid() && self.dirty.unwrap_or(false)
    }
}

/// Mapping from field key to [`FieldState`] for one form instance
///
/// Fields are kept sorted by key, and [`FormModel::clean`] yields them in
/// that order regardless of the order the host supplied them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormModel {
    fields: BTreeMap<String, FieldState>,
}

impl FormModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap each raw value as `{ value: raw }`
    pub fn from_raw(raw: &RawModel) -> Self {
        let fields = raw
            .iter()
            .map(|(key, value)| (key.clone(), FieldState::wrap(value.clone())))
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldState> {
        self.fields.get(key)
    }

    /// Raw value of a field, if present
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).map(|state| &state.value)
    }

    pub fn insert(&mut self, key: impl Into<String>, state: FieldState) -> Option<FieldState> {
        self.fields.insert(key.into(), state)
    }

    /// Merge a validation result into the field stored under `key`
    pub fn apply(&mut self, key: &str, result: ValidationResult) {
        self.fields.entry(key.to_string()).or_default().apply(result);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldState)> {
        self.fields.iter()
    }

    /// Strip validation state, keeping only truthy values, sorted by key
    pub fn clean(&self) -> CleanModel {
        self.fields
            .iter()
            .filter(|(_, state)| is_truthy(&state.value))
            .map(|(key, state)| (key.clone(), state.value.clone()))
            .collect()
    }
}

impl FromIterator<(String, FieldState)> for FormModel {
    fn from_iter<T: IntoIterator<Item = (String, FieldState)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
