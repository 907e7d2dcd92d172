//! Contracts between a form controller and the schema renderer
//!
//! The controller does not interpret schemas. It hands the schema, layout,
//! current model, and [`ComponentMap`] to a [`SchemaRenderer`], together with
//! a [`FormCapabilities`] handle the renderer (and the field components it
//! builds) use to report edits, register validators, and request submission.

use std::collections::BTreeMap;
use std::fmt;

use ratatui::{layout::Rect, Frame};
use serde_json::Value;

use crate::controller::SubmitOutcome;
use crate::event::EventKind;
use crate::model::{FieldState, FormModel};
use crate::props::FormLayout;
use crate::validation::{ValidationResult, Validator};

/// Callbacks injected into the renderer for the duration of one call
pub trait FormCapabilities {
    /// Write a field's new state into the form's store slice
    fn on_model_change(&mut self, key: &str, result: ValidationResult);

    /// Register a validator for the current render pass
    fn register_validation_listener(&mut self, validator: Validator);

    /// Validate every field and submit if the form is valid
    fn on_submit(&mut self) -> SubmitOutcome;
}

/// Read-only data for a renderer call
#[derive(Clone, Copy)]
pub struct SchemaFormProps<'a> {
    pub schema: &'a Value,
    pub form: &'a FormLayout,
    pub model: &'a FormModel,
    pub mapper: &'a ComponentMap,
}

/// Renders a form from its schema and forwards input to its fields
pub trait SchemaRenderer {
    /// Draw the form.
    ///
    /// Field components register their validators through `caps` while
    /// rendering; the controller clears the previous pass's validators first.
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: SchemaFormProps<'_>,
        caps: &mut dyn FormCapabilities,
    );

    /// Route a terminal event to the fields.
    ///
    /// Default implementation ignores input (display-only renderers).
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: SchemaFormProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
    }
}

/// What a field component sees of its slot in the form
#[derive(Clone, Copy)]
pub struct FieldProps<'a> {
    pub key: &'a str,
    /// The field's own schema node
    pub schema: &'a Value,
    pub state: Option<&'a FieldState>,
    pub is_focused: bool,
}

impl FieldProps<'_> {
    /// Current raw value, `null` when the model has no entry
    pub fn value(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.state.map_or(&NULL, |state| &state.value)
    }
}

/// A field implementation looked up by schema type
pub trait FieldComponent {
    /// Rows this field needs
    fn height(&self) -> u16 {
        3
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: FieldProps<'_>,
        caps: &mut dyn FormCapabilities,
    );

    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: FieldProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
    }
}

/// Builds a fresh field component
pub type FieldFactory = fn() -> Box<dyn FieldComponent>;

/// Mapping from schema field type (`"string"`, `"boolean"`, ...) to a field factory
#[derive(Clone, Default)]
pub struct ComponentMap {
    factories: BTreeMap<String, FieldFactory>,
}

impl fmt::Debug for ComponentMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field_type: impl Into<String>, factory: FieldFactory) -> Self {
        self.insert(field_type, factory);
        self
    }

    pub fn insert(&mut self, field_type: impl Into<String>, factory: FieldFactory) {
        self.factories.insert(field_type.into(), factory);
    }

    pub fn contains(&self, field_type: &str) -> bool {
        self.factories.contains_key(field_type)
    }

    /// Instantiate the component registered for `field_type`
    pub fn build(&self, field_type: &str) -> Option<Box<dyn FieldComponent>> {
        self.factories.get(field_type).map(|factory| factory())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn field_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
