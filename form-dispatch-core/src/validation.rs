//! Validation results and the per-form validator registry

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verdict for a single field, produced by a validator or a field edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub key: String,
    pub valid: bool,
    #[serde(default)]
    pub dirty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn valid(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            valid: true,
            dirty: false,
            value: None,
            message: None,
        }
    }

    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            valid: false,
            dirty: false,
            value: None,
            message: Some(message.into()),
        }
    }

    /// Attach the field's current value
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }
}

/// A registered field validator.
///
/// Receives `mark_dirty`: when true the field should report itself as dirty,
/// as if the user had touched it.
pub type Validator = Box<dyn FnMut(bool) -> ValidationResult>;

/// Ordered collection of validators registered during one render pass
///
/// The registry is cleared at the start of every render pass, so it only
/// ever holds validators from fields that rendered most recently.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Vec<Validator>,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators_count", &self.validators.len())
            .finish()
    }
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every validator from the previous pass
    pub fn begin_pass(&mut self) {
        self.validators.clear();
    }

    /// Append a validator. No dedup is performed.
    pub fn register(&mut self, validator: Validator) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator in registration order.
    ///
    /// Each result is handed to `on_result` before the next validator runs.
    /// Returns `true` iff all validators reported valid. Never short-circuits;
    /// a panicking validator aborts the remaining ones.
    pub fn run_all(
        &mut self,
        mark_dirty: bool,
        mut on_result: impl FnMut(ValidationResult),
    ) -> bool {
        let mut all_valid = true;
        for (index, validator) in self.validators.iter_mut().enumerate() {
            let result = validator(mark_dirty);
            tracing::trace!(
                index,
                key = %result.key,
                valid = result.valid,
                "Validator ran"
            );
            if !result.valid {
                all_valid = false;
            }
            on_result(result);
        }
        all_valid
    }
}
