//! Form controller: binds one form instance to its store slice
//!
//! A [`FormController`] owns the lifecycle of the slice keyed by its form id.
//! Mounting creates the slice, unmounting (or dropping) removes it. Between
//! the two, field edits are written through the dispatcher, validators are
//! collected from the renderer on every pass, and [`FormController::submit`]
//! gates the completion callback on all of them passing.
//!
//! # Example
//!
//! ```ignore
//! use form_dispatch::prelude::*;
//!
//! let store = Rc::new(RefCell::new(Store::new(FormsState::default(), forms_reducer)));
//! let props = FormProps::builder()
//!     .id("signup")
//!     .schema(schema)
//!     .model(model)
//!     .component_map(components)
//!     .on_submit(|clean| println!("{clean:?}"))
//!     .build()?;
//!
//! let mut form = FormController::mount(props, Rc::clone(&store));
//! terminal.draw(|frame| form.render(&mut renderer, frame, frame.area()))?;
//! form.handle_event(&mut renderer, &event);
//! form.unmount();
//! ```

use ratatui::{layout::Rect, Frame};
use serde_json::Value;

use crate::dispatcher::FormDispatcher;
use crate::event::EventKind;
use crate::model::{FormModel, RawModel};
use crate::props::{FormLayout, FormProps, SubmitHandler};
use crate::renderer::{ComponentMap, FormCapabilities, SchemaFormProps, SchemaRenderer};
use crate::validation::{ValidationResult, Validator, ValidatorRegistry};

/// Result of a submit request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// All fields were valid and the completion callback ran
    Submitted,
    /// At least one field was invalid; no callback fired
    Invalid,
    /// All fields were valid but no completion callback is configured
    NoHandler,
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// A mounted form instance
pub struct FormController<D: FormDispatcher> {
    id: String,
    schema: Value,
    form: FormLayout,
    initial: RawModel,
    on_submit: Option<SubmitHandler>,
    component_map: ComponentMap,
    dispatcher: D,
    validators: ValidatorRegistry,
    mounted: bool,
}

impl<D: FormDispatcher> FormController<D> {
    /// Create the store slice for `props.id` and return the mounted controller
    pub fn mount(props: FormProps, mut dispatcher: D) -> Self {
        let FormProps {
            id,
            schema,
            form,
            model,
            on_submit,
            component_map,
        } = props;

        dispatcher.create_slice(&id, &model);
        tracing::debug!(form = %id, fields = model.len(), "Form mounted");

        Self {
            id,
            schema,
            form,
            initial: model,
            on_submit,
            component_map,
            dispatcher,
            validators: ValidatorRegistry::new(),
            mounted: true,
        }
    }

    /// Remove the store slice. The controller cannot be remounted.
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.dispatcher.remove_slice(&self.id);
        tracing::debug!(form = %self.id, "Form unmounted");
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Number of validators registered in the most recent render pass
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Current view of the form: the store slice, or the initial model
    /// wrapped as `{ value: raw }` if the slice does not exist
    pub fn model(&self) -> FormModel {
        self.dispatcher
            .read_slice(&self.id)
            .unwrap_or_else(|| FormModel::from_raw(&self.initial))
    }

    /// Write a field's state into the store slice
    pub fn on_field_change(&mut self, key: &str, result: ValidationResult) -> bool {
        self.capabilities().write(key, result)
    }

    /// Add a validator to the current pass
    pub fn register_validator(&mut self, validator: impl FnMut(bool) -> ValidationResult + 'static) {
        self.validators.register(Box::new(validator));
    }

    /// Run every validator; see [`ValidatorRegistry::run_all`].
    ///
    /// With `mark_dirty`, each result is written to the store as it arrives.
    pub fn validate_all(&mut self, mark_dirty: bool) -> bool {
        self.capabilities().validate_all(mark_dirty)
    }

    /// Validate with `mark_dirty` and, if everything passed, hand the clean
    /// model to the completion callback
    pub fn submit(&mut self) -> SubmitOutcome {
        self.capabilities().submit()
    }

    /// Start a new render pass and draw the form through `renderer`
    pub fn render<R: SchemaRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        frame: &mut Frame,
        area: Rect,
    ) {
        self.validators.begin_pass();
        let model = self.model();
        let (props, mut caps) = self.split(&model);
        renderer.render(frame, area, props, &mut caps);
        tracing::trace!(form = %self.id, validators = self.validators.len(), "Form rendered");
    }

    /// Forward an input event to the renderer.
    ///
    /// Returns `true` if the store slice changed and a re-render is needed.
    pub fn handle_event<R: SchemaRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        event: &EventKind,
    ) -> bool {
        let model = self.model();
        let (props, mut caps) = self.split(&model);
        renderer.handle_event(event, props, &mut caps);
        caps.changed
    }

    fn split<'c>(&'c mut self, model: &'c FormModel) -> (SchemaFormProps<'c>, Capabilities<'c, D>) {
        let props = SchemaFormProps {
            schema: &self.schema,
            form: &self.form,
            model,
            mapper: &self.component_map,
        };
        let caps = Capabilities {
            id: &self.id,
            initial: &self.initial,
            dispatcher: &mut self.dispatcher,
            validators: &mut self.validators,
            on_submit: &mut self.on_submit,
            changed: false,
        };
        (props, caps)
    }

    fn capabilities(&mut self) -> Capabilities<'_, D> {
        Capabilities {
            id: &self.id,
            initial: &self.initial,
            dispatcher: &mut self.dispatcher,
            validators: &mut self.validators,
            on_submit: &mut self.on_submit,
            changed: false,
        }
    }
}

impl<D: FormDispatcher> Drop for FormController<D> {
    fn drop(&mut self) {
        self.release();
    }
}

/// The controller's callbacks, borrowed apart from the props the renderer reads
struct Capabilities<'c, D: FormDispatcher> {
    id: &'c str,
    initial: &'c RawModel,
    dispatcher: &'c mut D,
    validators: &'c mut ValidatorRegistry,
    on_submit: &'c mut Option<SubmitHandler>,
    changed: bool,
}

impl<D: FormDispatcher> Capabilities<'_, D> {
    fn write(&mut self, key: &str, result: ValidationResult) -> bool {
        tracing::trace!(form = %self.id, key, valid = result.valid, "Field changed");
        let changed = self.dispatcher.set_field(self.id, key, result);
        self.changed |= changed;
        changed
    }

    fn validate_all(&mut self, mark_dirty: bool) -> bool {
        let id = self.id;
        let dispatcher = &mut *self.dispatcher;
        let changed = &mut self.changed;
        self.validators.run_all(mark_dirty, |result| {
            if mark_dirty {
                let key = result.key.clone();
                *changed |= dispatcher.set_field(id, &key, result);
            }
        })
    }

    fn submit(&mut self) -> SubmitOutcome {
        if !self.validate_all(true) {
            tracing::debug!(form = %self.id, "Submit blocked by invalid fields");
            return SubmitOutcome::Invalid;
        }

        let Some(handler) = self.on_submit.as_mut() else {
            tracing::debug!(form = %self.id, "Form valid, no submit handler");
            return SubmitOutcome::NoHandler;
        };

        let clean = self
            .dispatcher
            .read_slice(self.id)
            .unwrap_or_else(|| FormModel::from_raw(self.initial))
            .clean();
        tracing::debug!(form = %self.id, fields = clean.len(), "Form submitted");
        handler(clean);
        SubmitOutcome::Submitted
    }
}

impl<D: FormDispatcher> FormCapabilities for Capabilities<'_, D> {
    fn on_model_change(&mut self, key: &str, result: ValidationResult) {
        self.write(key, result);
    }

    fn register_validation_listener(&mut self, validator: Validator) {
        self.validators.register(validator);
    }

    fn on_submit(&mut self) -> SubmitOutcome {
        self.submit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ComponentMap;
    use crate::slices::FormAction;
    use crate::testing::{blank_field, RecordingDispatcher};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn props(model: serde_json::Value, on_submit: Option<SubmitHandler>) -> FormProps {
        let model = match model {
            Value::Object(map) => map,
            _ => panic!("model must be an object"),
        };
        let mut builder = FormProps::builder()
            .id("f1")
            .schema(json!({"type": "object"}))
            .model(model)
            .component_map(ComponentMap::new().with("string", blank_field));
        if let Some(handler) = on_submit {
            builder = builder.on_submit(handler);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_mount_then_unmount() {
        let recorder = RecordingDispatcher::shared();
        let form = FormController::mount(props(json!({"a": 1}), None), Rc::clone(&recorder));

        assert!(recorder.borrow().state().contains("f1"));

        form.unmount();

        let actions = recorder.borrow().actions().to_vec();
        assert_eq!(actions.len(), 2);
        assert!(matches!(&actions[0], FormAction::CreateSchemaFormStore { id, .. } if id == "f1"));
        assert!(matches!(&actions[1], FormAction::RemoveSchemaFormStore { id } if id == "f1"));
        assert!(recorder.borrow().state().is_empty());
    }

    #[test]
    fn test_drop_unmounts_once() {
        let recorder = RecordingDispatcher::shared();
        {
            let _form = FormController::mount(props(json!({}), None), Rc::clone(&recorder));
        }

        let names = recorder.borrow().action_names();
        assert_eq!(names, vec!["CREATE_SCHEMA_FORM_STORE", "REMOVE_SCHEMA_FORM_STORE"]);
    }

    #[test]
    fn test_model_falls_back_to_wrapped_initial() {
        let recorder = RecordingDispatcher::shared();
        let form = FormController::mount(props(json!({"name": "Ada"}), None), Rc::clone(&recorder));
        recorder.borrow_mut().set_field("f1", "name", ValidationResult::valid("name").with_value(json!("Bea")));
        assert_eq!(form.model().value("name"), Some(&json!("Bea")));

        // Slice removed behind the controller's back
        recorder.borrow_mut().remove_slice("f1");
        let model = form.model();
        assert_eq!(model.value("name"), Some(&json!("Ada")));
        assert_eq!(model.get("name").unwrap().valid, None);
    }

    #[test]
    fn test_on_field_change_writes_slice() {
        let recorder = RecordingDispatcher::shared();
        let mut form = FormController::mount(props(json!({"name": ""}), None), Rc::clone(&recorder));

        let changed = form.on_field_change(
            "name",
            ValidationResult::valid("name").with_value(json!("Ada")),
        );

        assert!(changed);
        assert_eq!(form.model().value("name"), Some(&json!("Ada")));
        assert_eq!(form.model().get("name").unwrap().valid, Some(true));
    }

    #[test]
    fn test_validate_all_without_marking_does_not_write() {
        let recorder = RecordingDispatcher::shared();
        let mut form = FormController::mount(props(json!({"a": 1}), None), Rc::clone(&recorder));
        form.register_validator(|dirty| ValidationResult::invalid("a", "bad").dirty(dirty));

        assert!(!form.validate_all(false));
        assert_eq!(recorder.borrow().actions().len(), 1);
    }

    #[test]
    fn test_submit_invalid_marks_fields_and_skips_callback() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&submitted);
        let recorder = RecordingDispatcher::shared();
        let mut form = FormController::mount(
            props(
                json!({"name": "", "age": 30}),
                Some(Box::new(move |clean| sink.borrow_mut().push(clean))),
            ),
            Rc::clone(&recorder),
        );
        form.register_validator(|dirty| ValidationResult::invalid("name", "required").dirty(dirty));
        form.register_validator(|dirty| ValidationResult::valid("age").dirty(dirty));

        assert_eq!(form.submit(), SubmitOutcome::Invalid);
        assert!(submitted.borrow().is_empty());

        let model = form.model();
        assert!(model.get("name").unwrap().shows_error());
        assert_eq!(model.get("age").unwrap().valid, Some(true));
        assert_eq!(model.get("age").unwrap().dirty, Some(true));
    }

    #[test]
    fn test_submit_without_handler() {
        let mut recorder = RecordingDispatcher::new();
        let mut form = FormController::mount(props(json!({"a": 1}), None), &mut recorder);
        form.register_validator(|_| ValidationResult::valid("a"));

        let outcome = form.submit();
        assert_eq!(outcome, SubmitOutcome::NoHandler);
        assert!(!outcome.is_submitted());
        assert_eq!(
            form.dispatcher().action_names(),
            vec!["CREATE_SCHEMA_FORM_STORE", "SET_SCHEMA_FORM_DATA"]
        );
    }
}
