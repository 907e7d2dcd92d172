//! Field components used by the signup renderer
//!
//! Each field validates its own value against its schema node and registers
//! that check with the form on every render pass. Validators read the field's
//! live value, so a submit right after an edit sees the edit even before the
//! next render. They report a verdict only; values reach the store through
//! edits.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyModifiers};
use form_dispatch::prelude::*;
use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use serde_json::Value;

/// Text shown for a stored value
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn title_of<'a>(props: &FieldProps<'a>) -> &'a str {
    props
        .schema
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(props.key)
}

fn border_style(props: &FieldProps<'_>) -> Style {
    match props.state {
        Some(state) if state.shows_error() => Style::default().fg(Color::Red),
        _ if props.is_focused => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::DarkGray),
    }
}

fn field_block<'a>(props: &FieldProps<'a>) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(props))
        .title(format!(" {} ", title_of(props)));
    if let Some(state) = props.state.filter(|s| s.shows_error()) {
        if let Some(message) = &state.message {
            block = block.title_bottom(format!(" {message} "));
        }
    }
    block
}

/// Convert typed text into the stored value for a schema type.
///
/// Numeric text that does not parse is kept as a string so the validator
/// can reject it.
fn parse_input(schema: &Value, text: &str) -> Value {
    match schema.get("type").and_then(Value::as_str) {
        Some("integer") if !text.is_empty() => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(text.to_string())),
        Some("number") if !text.is_empty() => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string())),
        Some("integer") | Some("number") => Value::Null,
        _ => Value::String(text.to_string()),
    }
}

/// Check a text or numeric value against `minLength`, `format: email`, and
/// `minimum`
pub fn check_text(key: &str, schema: &Value, value: &Value, dirty: bool) -> ValidationResult {
    let failure = match schema.get("type").and_then(Value::as_str) {
        Some("integer") | Some("number") => match value {
            Value::Null => None,
            Value::Number(n) => schema
                .get("minimum")
                .and_then(Value::as_f64)
                .filter(|min| n.as_f64().is_some_and(|v| v < *min))
                .map(|min| format!("must be at least {min}")),
            _ => Some("must be a number".to_string()),
        },
        _ => {
            let text = display_text(value);
            let min_length = schema.get("minLength").and_then(Value::as_u64).unwrap_or(0);
            if (text.chars().count() as u64) < min_length {
                Some(if min_length == 1 {
                    "required".to_string()
                } else {
                    format!("at least {min_length} characters")
                })
            } else if schema.get("format").and_then(Value::as_str) == Some("email")
                && !text.is_empty()
                && !text.contains('@')
            {
                Some("not an email address".to_string())
            } else {
                None
            }
        }
    };

    let result = match failure {
        Some(message) => ValidationResult::invalid(key, message),
        None => ValidationResult::valid(key),
    };
    result.dirty(dirty)
}

/// Check a checkbox against `const: true`
pub fn check_flag(key: &str, schema: &Value, value: &Value, dirty: bool) -> ValidationResult {
    let must_be_set = schema.get("const") == Some(&Value::Bool(true));
    let result = if must_be_set && value != &Value::Bool(true) {
        ValidationResult::invalid(key, "must be accepted")
    } else {
        ValidationResult::valid(key)
    };
    result.dirty(dirty)
}

/// Single-line text field with cursor
///
/// Handles typing, backspace, delete, and cursor movement. Every edit is
/// validated and written back with the field marked dirty.
///
/// The typed text is kept here and only its parsed value goes to the store,
/// so partial numbers like `1.` survive a round trip.
#[derive(Default)]
pub struct TextField {
    /// Cursor position (byte index)
    cursor: usize,
    /// Text as typed
    text: String,
    /// Value the registered validator checks
    live: Rc<RefCell<Value>>,
}

/// Factory for the component map
pub fn text_field() -> Box<dyn FieldComponent> {
    Box::new(TextField::default())
}

impl TextField {
    /// Adopt the stored value unless it is what the buffer already parses to
    fn sync(&mut self, schema: &Value, value: &Value) {
        if parse_input(schema, &self.text) != *value {
            self.text = display_text(value);
            self.cursor = self.text.len();
        }
        self.cursor = self.cursor.min(self.text.len());
        *self.live.borrow_mut() = value.clone();
    }

    fn move_left(&mut self, text: &str) {
        if let Some((i, _)) = text[..self.cursor].char_indices().last() {
            self.cursor = i;
        }
    }

    fn move_right(&mut self, text: &str) {
        if let Some(c) = text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Apply an edit key; returns the new text if it changed
    fn edit(&mut self, code: KeyCode, modifiers: KeyModifiers, text: &str) -> Option<String> {
        self.cursor = self.cursor.min(text.len());

        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor = text.len();
                    None
                }
                KeyCode::Char('u') => {
                    self.cursor = 0;
                    Some(String::new())
                }
                _ => None,
            };
        }

        match code {
            KeyCode::Char(c) => {
                let mut new_text = String::with_capacity(text.len() + c.len_utf8());
                new_text.push_str(&text[..self.cursor]);
                new_text.push(c);
                new_text.push_str(&text[self.cursor..]);
                self.cursor += c.len_utf8();
                Some(new_text)
            }
            KeyCode::Backspace => {
                let end = self.cursor;
                self.move_left(text);
                (self.cursor < end).then(|| format!("{}{}", &text[..self.cursor], &text[end..]))
            }
            KeyCode::Delete => {
                let c = text[self.cursor..].chars().next()?;
                let end = self.cursor + c.len_utf8();
                Some(format!("{}{}", &text[..self.cursor], &text[end..]))
            }
            KeyCode::Left => {
                self.move_left(text);
                None
            }
            KeyCode::Right => {
                self.move_right(text);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = text.len();
                None
            }
            _ => None,
        }
    }
}

impl FieldComponent for TextField {
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: FieldProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
        self.sync(props.schema, props.value());

        let key = props.key.to_string();
        let schema = props.schema.clone();
        let live = Rc::clone(&self.live);
        caps.register_validation_listener(Box::new(move |dirty| {
            check_text(&key, &schema, &live.borrow(), dirty)
        }));

        let text = &self.text;
        let placeholder = props
            .schema
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("");
        let (shown, style) = if text.is_empty() {
            (placeholder.to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (text.clone(), Style::default())
        };

        frame.render_widget(
            Paragraph::new(shown).style(style).block(field_block(&props)),
            area,
        );

        if props.is_focused && area.width > 2 {
            let cursor_x = area.x + 1 + text[..self.cursor].chars().count() as u16;
            if cursor_x < area.x + area.width - 1 {
                frame.set_cursor_position((cursor_x, area.y + 1));
            }
        }
    }

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: FieldProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
        if !props.is_focused {
            return;
        }
        let Some(key) = event.key() else { return };
        self.sync(props.schema, props.value());
        let text = self.text.clone();
        if let Some(new_text) = self.edit(key.code, key.modifiers, &text) {
            let value = parse_input(props.schema, &new_text);
            self.text = new_text;
            *self.live.borrow_mut() = value.clone();
            let result = check_text(props.key, props.schema, &value, true).with_value(value);
            caps.on_model_change(props.key, result);
        }
    }
}

/// Boolean field toggled with space
#[derive(Default)]
pub struct Checkbox {
    live: Rc<RefCell<Value>>,
}

/// Factory for the component map
pub fn checkbox() -> Box<dyn FieldComponent> {
    Box::new(Checkbox::default())
}

impl FieldComponent for Checkbox {
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: FieldProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
        *self.live.borrow_mut() = props.value().clone();

        let key = props.key.to_string();
        let schema = props.schema.clone();
        let live = Rc::clone(&self.live);
        caps.register_validation_listener(Box::new(move |dirty| {
            check_flag(&key, &schema, &live.borrow(), dirty)
        }));

        let mark = if props.value() == &Value::Bool(true) {
            "[x]"
        } else {
            "[ ]"
        };
        let label = props
            .schema
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("");
        frame.render_widget(
            Paragraph::new(format!("{mark} {label}")).block(field_block(&props)),
            area,
        );
    }

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: FieldProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
        if props.is_focused && event.is_key(KeyCode::Char(' ')) {
            let value = Value::Bool(props.value() != &Value::Bool(true));
            *self.live.borrow_mut() = value.clone();
            let result = check_flag(props.key, props.schema, &value, true).with_value(value);
            caps.on_model_change(props.key, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_dispatch::testing::{char_key, RenderHarness};
    use form_dispatch::Validator;
    use serde_json::json;

    /// Capabilities backed by an in-memory model, keeping registered validators
    #[derive(Default)]
    struct ModelCaps {
        model: FormModel,
        validators: Vec<Validator>,
    }

    impl FormCapabilities for ModelCaps {
        fn on_model_change(&mut self, key: &str, result: ValidationResult) {
            self.model.apply(key, result);
        }

        fn register_validation_listener(&mut self, validator: Validator) {
            self.validators.push(validator);
        }

        fn on_submit(&mut self) -> SubmitOutcome {
            SubmitOutcome::NoHandler
        }
    }

    impl ModelCaps {
        fn run_validators(&mut self) -> Vec<ValidationResult> {
            self.validators.iter_mut().map(|v| v(true)).collect()
        }
    }

    fn render(field: &mut dyn FieldComponent, caps: &mut ModelCaps, key: &str, schema: &Value) {
        let mut harness = RenderHarness::new(30, 3);
        harness.render(|frame| {
            let area = frame.area();
            let state = caps.model.get(key).cloned();
            let props = FieldProps {
                key,
                schema,
                state: state.as_ref(),
                is_focused: true,
            };
            field.render(frame, area, props, caps);
        });
    }

    fn press(
        field: &mut dyn FieldComponent,
        caps: &mut ModelCaps,
        key: &str,
        schema: &Value,
        event: EventKind,
    ) {
        let state = caps.model.get(key).cloned();
        let props = FieldProps {
            key,
            schema,
            state: state.as_ref(),
            is_focused: true,
        };
        field.handle_event(&event, props, caps);
    }

    #[test]
    fn test_check_text_min_length() {
        let schema = json!({"type": "string", "minLength": 1});

        let result = check_text("name", &schema, &json!(""), true);
        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some("required"));
        assert!(result.dirty);

        let result = check_text("name", &schema, &json!("Ada"), false);
        assert!(result.valid);
        assert_eq!(result.value, None);
    }

    #[test]
    fn test_number_field_keeps_typed_text() {
        let schema = json!({"type": "number", "minimum": 0});
        let mut field = TextField::default();
        let mut caps = ModelCaps::default();

        for c in "1.5".chars() {
            press(&mut field, &mut caps, "score", &schema, char_key(c));
        }

        let state = caps.model.get("score").unwrap();
        assert_eq!(state.value, json!(1.5));
        assert_eq!(state.valid, Some(true));
        assert_eq!(field.text, "1.5");
    }

    #[test]
    fn test_text_validator_sees_edit_before_next_render() {
        let schema = json!({"type": "string", "minLength": 1});
        let mut field = TextField::default();
        let mut caps = ModelCaps::default();
        caps.model.insert("name", FieldState::wrap(json!("")));

        render(&mut field, &mut caps, "name", &schema);
        press(&mut field, &mut caps, "name", &schema, char_key('B'));

        let results = caps.run_validators();
        assert_eq!(results.len(), 1);
        assert!(results[0].valid);
        assert_eq!(results[0].value, None);

        for result in results {
            let key = result.key.clone();
            caps.model.apply(&key, result);
        }
        assert_eq!(caps.model.value("name"), Some(&json!("B")));
    }

    #[test]
    fn test_checkbox_validator_sees_toggle_before_next_render() {
        let schema = json!({"type": "boolean", "const": true});
        let mut field = Checkbox::default();
        let mut caps = ModelCaps::default();
        caps.model.insert("terms", FieldState::wrap(json!(false)));

        render(&mut field, &mut caps, "terms", &schema);
        assert!(!caps.run_validators()[0].valid);

        press(&mut field, &mut caps, "terms", &schema, char_key(' '));
        assert!(caps.run_validators()[0].valid);
        assert_eq!(caps.model.value("terms"), Some(&json!(true)));
    }

    #[test]
    fn test_check_text_email() {
        let schema = json!({"type": "string", "format": "email"});
        assert!(!check_text("email", &schema, &json!("ada"), true).valid);
        assert!(check_text("email", &schema, &json!("ada@example.com"), true).valid);
        assert!(check_text("email", &schema, &json!(""), true).valid);
    }

    #[test]
    fn test_check_numbers() {
        let schema = json!({"type": "integer", "minimum": 18});
        assert!(check_text("age", &schema, &json!(30), true).valid);
        assert!(check_text("age", &schema, &Value::Null, true).valid);

        let too_young = check_text("age", &schema, &json!(12), true);
        assert_eq!(too_young.message.as_deref(), Some("must be at least 18"));

        let garbage = check_text("age", &schema, &json!("3x"), true);
        assert_eq!(garbage.message.as_deref(), Some("must be a number"));
    }

    #[test]
    fn test_parse_input() {
        let int = json!({"type": "integer"});
        assert_eq!(parse_input(&int, "42"), json!(42));
        assert_eq!(parse_input(&int, "4x"), json!("4x"));
        assert_eq!(parse_input(&int, ""), Value::Null);
        assert_eq!(parse_input(&json!({"type": "string"}), "hi"), json!("hi"));
    }

    #[test]
    fn test_check_flag() {
        let schema = json!({"type": "boolean", "const": true});
        assert!(!check_flag("terms", &schema, &Value::Null, true).valid);
        assert!(check_flag("terms", &schema, &json!(true), true).valid);
        assert!(check_flag("news", &json!({"type": "boolean"}), &json!(false), true).valid);
    }

    #[test]
    fn test_text_editing() {
        let mut field = TextField::default();

        assert_eq!(
            field.edit(KeyCode::Char('a'), KeyModifiers::NONE, ""),
            Some("a".to_string())
        );
        assert_eq!(
            field.edit(KeyCode::Char('é'), KeyModifiers::NONE, "a"),
            Some("aé".to_string())
        );
        assert_eq!(field.cursor, 3);

        assert_eq!(
            field.edit(KeyCode::Backspace, KeyModifiers::NONE, "aé"),
            Some("a".to_string())
        );
        assert_eq!(field.cursor, 1);

        assert_eq!(field.edit(KeyCode::Home, KeyModifiers::NONE, "a"), None);
        assert_eq!(field.edit(KeyCode::Backspace, KeyModifiers::NONE, "a"), None);
        assert_eq!(
            field.edit(KeyCode::Delete, KeyModifiers::NONE, "a"),
            Some(String::new())
        );
        assert_eq!(
            field.edit(KeyCode::Char('u'), KeyModifiers::CONTROL, "abc"),
            Some(String::new())
        );
    }
}
