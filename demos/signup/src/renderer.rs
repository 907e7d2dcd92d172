//! Schema renderer for the signup demo
//!
//! Fields are built once from the component map, in layout order, and keep
//! their own widget state (cursor position) across passes. Values always come
//! from the form's store slice.

use crossterm::event::KeyCode;
use form_dispatch::prelude::*;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
};
use serde_json::Value;

struct Slot {
    key: String,
    component: Box<dyn FieldComponent>,
}

/// Renders every field named by the form layout, one below the other
#[derive(Default)]
pub struct SignupRenderer {
    fields: Vec<Slot>,
    focus: usize,
    status: Option<SubmitOutcome>,
}

/// Field keys in display order.
///
/// Layout items are plain keys or `{"key": ...}` objects; `"*"` expands to
/// every schema property not listed elsewhere.
pub fn layout_keys(schema: &Value, form: &FormLayout) -> Vec<String> {
    let properties: Vec<&String> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().collect())
        .unwrap_or_default();

    let explicit: Vec<&str> = form
        .items()
        .iter()
        .filter_map(|item| match item {
            Value::String(key) if key != "*" => Some(key.as_str()),
            Value::Object(obj) => obj.get("key").and_then(Value::as_str),
            _ => None,
        })
        .collect();

    let mut keys = Vec::new();
    for item in form.items() {
        match item {
            Value::String(key) if key == "*" => keys.extend(
                properties
                    .iter()
                    .filter(|k| !explicit.contains(&k.as_str()))
                    .map(|k| k.to_string()),
            ),
            Value::String(key) => keys.push(key.clone()),
            Value::Object(obj) => {
                if let Some(key) = obj.get("key").and_then(Value::as_str) {
                    keys.push(key.to_string());
                }
            }
            _ => {}
        }
    }
    keys
}

impl SignupRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome of the most recent submit request
    pub fn status(&self) -> Option<SubmitOutcome> {
        self.status
    }

    pub fn focused_key(&self) -> Option<&str> {
        self.fields.get(self.focus).map(|slot| slot.key.as_str())
    }

    fn ensure_fields(&mut self, props: &SchemaFormProps<'_>) {
        if !self.fields.is_empty() {
            return;
        }
        for key in layout_keys(props.schema, props.form) {
            let Some(node) = props.schema.get("properties").and_then(|p| p.get(&key)) else {
                tracing::warn!(key = %key, "Layout names a field missing from the schema");
                continue;
            };
            let field_type = node.get("type").and_then(Value::as_str).unwrap_or("string");
            match props.mapper.build(field_type) {
                Some(component) => self.fields.push(Slot { key, component }),
                None => tracing::warn!(key = %key, field_type, "No component for field type"),
            }
        }
        tracing::debug!(fields = self.fields.len(), "Signup fields built");
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    fn status_line(&self) -> Paragraph<'static> {
        let (text, color) = match self.status() {
            None => (
                "Tab/Shift-Tab: move  Space: toggle  Enter: submit  Esc: quit",
                Color::DarkGray,
            ),
            Some(SubmitOutcome::Invalid) => ("Fix the highlighted fields", Color::Red),
            Some(SubmitOutcome::Submitted) => ("Submitted", Color::Green),
            Some(SubmitOutcome::NoHandler) => ("Form is valid", Color::Green),
        };
        Paragraph::new(text).style(Style::default().fg(color))
    }
}

impl SchemaRenderer for SignupRenderer {
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: SchemaFormProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
        self.ensure_fields(&props);

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(
            self.fields
                .iter()
                .map(|slot| Constraint::Length(slot.component.height())),
        );
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Fill(1));
        let rows = Layout::vertical(constraints).split(area);

        let title = props
            .schema
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Form");
        frame.render_widget(
            Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD)),
            rows[0],
        );

        let focus = self.focus;
        for (i, slot) in self.fields.iter_mut().enumerate() {
            let field = FieldProps {
                key: &slot.key,
                schema: &props.schema["properties"][slot.key.as_str()],
                state: props.model.get(&slot.key),
                is_focused: i == focus,
            };
            slot.component.render(frame, rows[i + 1], field, caps);
        }

        frame.render_widget(self.status_line(), rows[self.fields.len() + 1]);
    }

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: SchemaFormProps<'_>,
        caps: &mut dyn FormCapabilities,
    ) {
        let Some(key) = event.key() else { return };
        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(matches!(key.code, KeyCode::Tab | KeyCode::Down));
                tracing::trace!(focus = ?self.focused_key(), "Focus moved");
            }
            KeyCode::Enter => {
                let outcome = caps.on_submit();
                tracing::info!(?outcome, "Submit requested");
                self.status = Some(outcome);
            }
            _ => {
                let focus = self.focus;
                if let Some(slot) = self.fields.get_mut(focus) {
                    let field = FieldProps {
                        key: &slot.key,
                        schema: &props.schema["properties"][slot.key.as_str()],
                        state: props.model.get(&slot.key),
                        is_focused: true,
                    };
                    slot.component.handle_event(event, field, caps);
                }
            }
        }
    }
}
