//! End-to-end behaviour of a mounted form against a recording store

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::KeyCode;
use form_dispatch::prelude::*;
use form_dispatch::testing::{blank_field, char_key, key, RecordingDispatcher, RenderHarness};
use form_dispatch::{assert_emitted, assert_not_emitted, count_emitted};
use ratatui::widgets::Paragraph;
use serde_json::{json, Value};

fn raw(value: Value) -> RawModel {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn props(model: Value, submitted: Option<Rc<RefCell<Vec<CleanModel>>>>) -> FormProps {
    let mut builder = FormProps::builder()
        .id("f1")
        .schema(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "number"}
            }
        }))
        .model(raw(model))
        .component_map(ComponentMap::new().with("string", blank_field));
    if let Some(sink) = submitted {
        builder = builder.on_submit(move |clean| sink.borrow_mut().push(clean));
    }
    builder.build().expect("props are complete")
}

/// Renders one line per model field and registers a "must be truthy"
/// validator for each. Typing appends to `name`; Enter submits.
///
/// Validators read `live`, which edits update immediately.
#[derive(Default)]
struct LineRenderer {
    passes: usize,
    live: Rc<RefCell<RawModel>>,
}

impl SchemaRenderer for LineRenderer {
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: SchemaFormProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
        self.passes += 1;
        let mut lines = Vec::new();
        for (key, state) in props.model.iter() {
            lines.push(format!("{key}: {}", state.value));

            self.live.borrow_mut().insert(key.clone(), state.value.clone());

            let key = key.clone();
            let live = Rc::clone(&self.live);
            caps.register_validation_listener(Box::new(move |dirty| {
                let truthy = live
                    .borrow()
                    .get(&key)
                    .is_some_and(form_dispatch::is_truthy);
                let result = if truthy {
                    ValidationResult::valid(key.clone())
                } else {
                    ValidationResult::invalid(key.clone(), "required")
                };
                result.dirty(dirty)
            }));
        }
        frame.render_widget(Paragraph::new(lines.join("\n")), area);
    }

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: SchemaFormProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
        let Some(key_event) = event.key() else { return };
        match key_event.code {
            KeyCode::Enter => {
                caps.on_submit();
            }
            KeyCode::Char(c) => {
                let mut name = props
                    .model
                    .value("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                name.push(c);
                let value = Value::String(name);
                self.live.borrow_mut().insert("name".into(), value.clone());
                caps.on_model_change("name", ValidationResult::valid("name").with_value(value));
            }
            _ => {}
        }
    }
}

#[test]
fn test_mount_unmount_without_interaction() {
    let recorder = RecordingDispatcher::shared();
    let form = FormController::mount(props(json!({"name": "Ada"}), None), Rc::clone(&recorder));
    form.unmount();

    let recorder = recorder.borrow();
    assert_eq!(
        recorder.action_names(),
        vec!["CREATE_SCHEMA_FORM_STORE", "REMOVE_SCHEMA_FORM_STORE"]
    );
    assert_not_emitted!(recorder.actions(), FormAction::SetSchemaFormData { .. });
}

#[test]
fn test_validate_all_runs_every_validator_in_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let recorder = RecordingDispatcher::shared();
    let mut form = FormController::mount(props(json!({}), None), Rc::clone(&recorder));

    for (key, valid) in [("a", true), ("b", false), ("c", true)] {
        let order = Rc::clone(&order);
        form.register_validator(move |dirty| {
            order.borrow_mut().push(key);
            let result = if valid {
                ValidationResult::valid(key)
            } else {
                ValidationResult::invalid(key, "bad")
            };
            result.dirty(dirty)
        });
    }

    assert!(!form.validate_all(true));
    assert_eq!(*order.borrow(), vec!["a", "b", "c"]);

    let actions = recorder.borrow_mut().drain_actions();
    let keys: Vec<_> = actions
        .iter()
        .filter_map(|a| match a {
            FormAction::SetSchemaFormData { key, result, .. } => Some((key.as_str(), result.valid)),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec![("a", true), ("b", false), ("c", true)]);
}

#[test]
fn test_submit_blocked_when_a_field_is_invalid() {
    let submitted = Rc::new(RefCell::new(Vec::new()));
    let recorder = RecordingDispatcher::shared();
    let mut form = FormController::mount(
        props(json!({"name": "", "age": 30}), Some(Rc::clone(&submitted))),
        Rc::clone(&recorder),
    );
    form.register_validator(|dirty| ValidationResult::invalid("name", "required").dirty(dirty));
    form.register_validator(|dirty| ValidationResult::valid("age").dirty(dirty));

    assert_eq!(form.submit(), SubmitOutcome::Invalid);
    assert!(submitted.borrow().is_empty());

    let actions = recorder.borrow().actions().to_vec();
    assert_eq!(count_emitted!(actions, FormAction::SetSchemaFormData { .. }), 2);
    assert_emitted!(
        actions,
        FormAction::SetSchemaFormData { key, result, .. } if key == "name" && !result.valid && result.dirty
    );

    let model = form.model();
    assert!(model.get("name").unwrap().shows_error());
    assert_eq!(model.get("age").unwrap().valid, Some(true));
}

#[test]
fn test_submit_delivers_clean_model() {
    let submitted = Rc::new(RefCell::new(Vec::new()));
    let recorder = RecordingDispatcher::shared();
    let mut form = FormController::mount(
        props(json!({"name": "Alice", "age": 30}), Some(Rc::clone(&submitted))),
        Rc::clone(&recorder),
    );
    form.register_validator(|dirty| ValidationResult::valid("name").dirty(dirty));
    form.register_validator(|dirty| ValidationResult::valid("age").dirty(dirty));

    assert!(form.submit().is_submitted());

    let submitted = submitted.borrow();
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        Value::Object(submitted[0].clone()),
        json!({"name": "Alice", "age": 30})
    );
}

#[test]
fn test_submit_drops_falsy_values() {
    let submitted = Rc::new(RefCell::new(Vec::new()));
    let recorder = RecordingDispatcher::shared();
    let mut form = FormController::mount(
        props(
            json!({"name": "", "age": 30, "subscribed": false}),
            Some(Rc::clone(&submitted)),
        ),
        Rc::clone(&recorder),
    );

    assert_eq!(form.submit(), SubmitOutcome::Submitted);
    assert_eq!(Value::Object(submitted.borrow()[0].clone()), json!({"age": 30}));
}

#[test]
fn test_render_pass_rebuilds_validators() {
    let recorder = RecordingDispatcher::shared();
    let mut form =
        FormController::mount(props(json!({"name": "Ada", "age": 30}), None), Rc::clone(&recorder));
    let mut renderer = LineRenderer::default();
    let mut harness = RenderHarness::new(30, 4);

    for _ in 0..3 {
        harness.render(|frame| {
            let area = frame.area();
            form.render(&mut renderer, frame, area)
        });
    }

    assert_eq!(renderer.passes, 3);
    assert_eq!(form.validator_count(), 2);
}

#[test]
fn test_render_shows_store_values() {
    let recorder = RecordingDispatcher::shared();
    let mut form = FormController::mount(props(json!({"name": "Ada"}), None), Rc::clone(&recorder));
    form.on_field_change("name", ValidationResult::valid("name").with_value(json!("Bea")));

    let mut renderer = LineRenderer::default();
    let mut harness = RenderHarness::new(30, 2);
    let output = harness.render_to_string_plain(|frame| {
        let area = frame.area();
        form.render(&mut renderer, frame, area)
    });

    assert!(output.contains("name: \"Bea\""));
}

#[test]
fn test_events_flow_through_capabilities() {
    let submitted = Rc::new(RefCell::new(Vec::new()));
    let recorder = RecordingDispatcher::shared();
    let mut form = FormController::mount(
        props(json!({"name": ""}), Some(Rc::clone(&submitted))),
        Rc::clone(&recorder),
    );
    let mut renderer = LineRenderer::default();
    let mut harness = RenderHarness::new(30, 2);

    // Empty name: submit is blocked
    harness.render(|frame| {
        let area = frame.area();
        form.render(&mut renderer, frame, area)
    });
    assert!(form.handle_event(&mut renderer, &key(KeyCode::Enter)));
    assert!(submitted.borrow().is_empty());

    // Type a name, re-render so validators see it, then submit
    assert!(form.handle_event(&mut renderer, &char_key('A')));
    harness.render(|frame| {
        let area = frame.area();
        form.render(&mut renderer, frame, area)
    });
    form.handle_event(&mut renderer, &key(KeyCode::Enter));

    assert_eq!(submitted.borrow().len(), 1);
    assert_eq!(Value::Object(submitted.borrow()[0].clone()), json!({"name": "A"}));
}

#[test]
fn test_submit_right_after_edit_keeps_it() {
    let submitted = Rc::new(RefCell::new(Vec::new()));
    let recorder = RecordingDispatcher::shared();
    let mut form = FormController::mount(
        props(json!({"name": ""}), Some(Rc::clone(&submitted))),
        Rc::clone(&recorder),
    );
    let mut renderer = LineRenderer::default();
    let mut harness = RenderHarness::new(30, 2);
    harness.render(|frame| {
        let area = frame.area();
        form.render(&mut renderer, frame, area)
    });

    // Enter arrives before any re-render
    form.handle_event(&mut renderer, &char_key('Z'));
    form.handle_event(&mut renderer, &key(KeyCode::Enter));

    assert_eq!(form.model().value("name"), Some(&json!("Z")));
    assert_eq!(Value::Object(submitted.borrow()[0].clone()), json!({"name": "Z"}));
}

#[test]
fn test_two_forms_share_one_store() {
    let store = Rc::new(RefCell::new(StoreWithMiddleware::new(
        FormsState::default(),
        forms_reducer,
        LoggingMiddleware::new(),
    )));

    let first = FormController::mount(props(json!({"name": "Ada"}), None), Rc::clone(&store));
    let second = FormController::mount(
        FormDefinition {
            id: "f2".into(),
            schema: json!({"type": "object"}),
            form: FormLayout::default(),
            model: raw(json!({"name": "Bea"})),
        }
        .into_builder()
        .component_map(ComponentMap::new().with("string", blank_field))
        .build()
        .unwrap(),
        Rc::clone(&store),
    );

    assert_eq!(store.borrow().state().ids().collect::<Vec<_>>(), vec!["f1", "f2"]);

    drop(first);
    assert_eq!(store.borrow().state().ids().collect::<Vec<_>>(), vec!["f2"]);
    assert_eq!(second.model().value("name"), Some(&json!("Bea")));
}
