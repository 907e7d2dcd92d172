//! Keyed form slices: state, actions, and reducer
//!
//! The store holds one [`FormModel`] per mounted form, keyed by form id.
//! Slices are created on mount, updated field by field, and removed on
//! unmount.

use std::collections::BTreeMap;

use crate::model::{FormModel, RawModel};
use crate::validation::ValidationResult;
use crate::Action;

/// Every live form slice, keyed by form id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormsState {
    forms: BTreeMap<String, FormModel>,
}

impl FormsState {
    pub fn get(&self, id: &str) -> Option<&FormModel> {
        self.forms.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.forms.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Ids of every live slice, in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.forms.clear();
    }
}

/// Actions accepted by [`forms_reducer`]
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// Allocate a slice, wrapping each raw value as a field state
    CreateSchemaFormStore { id: String, model: RawModel },
    /// Drop the slice for a form
    RemoveSchemaFormStore { id: String },
    /// Merge a validation result into one field of a slice
    SetSchemaFormData {
        id: String,
        key: String,
        result: ValidationResult,
    },
}

impl FormAction {
    /// Id of the form this action targets
    pub fn form_id(&self) -> &str {
        match self {
            FormAction::CreateSchemaFormStore { id, .. }
            | FormAction::RemoveSchemaFormStore { id }
            | FormAction::SetSchemaFormData { id, .. } => id,
        }
    }
}

impl Action for FormAction {
    fn name(&self) -> &'static str {
        match self {
            FormAction::CreateSchemaFormStore { .. } => "CREATE_SCHEMA_FORM_STORE",
            FormAction::RemoveSchemaFormStore { .. } => "REMOVE_SCHEMA_FORM_STORE",
            FormAction::SetSchemaFormData { .. } => "SET_SCHEMA_FORM_DATA",
        }
    }
}

/// Reducer for [`FormsState`]
///
/// Creating a slice replaces any existing slice with the same id. Writes to
/// an id with no slice are dropped so a late field edit cannot resurrect a
/// removed form.
pub fn forms_reducer(state: &mut FormsState, action: FormAction) -> bool {
    match action {
        FormAction::CreateSchemaFormStore { id, model } => {
            if state.forms.contains_key(&id) {
                tracing::warn!(form = %id, "Replacing existing form slice");
            }
            state.forms.insert(id, FormModel::from_raw(&model));
            true
        }
        FormAction::RemoveSchemaFormStore { id } => state.forms.remove(&id).is_some(),
        FormAction::SetSchemaFormData { id, key, result } => match state.forms.get_mut(&id) {
            Some(slice) => {
                slice.apply(&key, result);
                true
            }
            None => {
                tracing::warn!(form = %id, key = %key, "Dropping write to missing form slice");
                false
            }
        },
    }
}
