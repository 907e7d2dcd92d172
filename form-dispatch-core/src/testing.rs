//! Test utilities for form-dispatch
//!
//! - [`RecordingDispatcher`]: a real form store that also records every action
//! - [`RenderHarness`]: render into an in-memory ratatui buffer
//! - Key helpers and assertion macros for recorded actions
//!
//! # Example
//!
//! ```ignore
//! use form_dispatch::testing::RecordingDispatcher;
//! use form_dispatch::{assert_emitted, FormAction, FormController};
//!
//! let recorder = RecordingDispatcher::shared();
//! let form = FormController::mount(props, Rc::clone(&recorder));
//! form.unmount();
//!
//! let actions = recorder.borrow().actions().to_vec();
//! assert_emitted!(actions, FormAction::RemoveSchemaFormStore { .. });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Frame, Terminal};

use crate::dispatcher::FormDispatcher;
use crate::event::EventKind;
use crate::model::{FormModel, RawModel};
use crate::renderer::{FieldComponent, FieldProps, FormCapabilities};
use crate::slices::{forms_reducer, FormAction, FormsState};
use crate::store::Store;
use crate::validation::ValidationResult;
use crate::Action;

/// Form store that records every action dispatched through it
pub struct RecordingDispatcher {
    store: Store<FormsState, FormAction>,
    actions: Vec<FormAction>,
}

impl Default for RecordingDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self {
            store: Store::new(FormsState::default(), forms_reducer),
            actions: Vec::new(),
        }
    }

    /// A recorder behind `Rc<RefCell<_>>`, for mounting while still inspecting it
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn state(&self) -> &FormsState {
        self.store.state()
    }

    /// Every action dispatched so far, in order
    pub fn actions(&self) -> &[FormAction] {
        &self.actions
    }

    /// Action type names, in dispatch order
    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(Action::name).collect()
    }

    /// Take the recorded actions, leaving the store untouched
    pub fn drain_actions(&mut self) -> Vec<FormAction> {
        std::mem::take(&mut self.actions)
    }

    fn record(&mut self, action: FormAction) -> bool {
        self.actions.push(action.clone());
        self.store.dispatch(action)
    }
}

impl FormDispatcher for RecordingDispatcher {
    fn create_slice(&mut self, id: &str, model: &RawModel) -> bool {
        self.record(FormAction::CreateSchemaFormStore {
            id: id.to_string(),
            model: model.clone(),
        })
    }

    fn remove_slice(&mut self, id: &str) -> bool {
        self.record(FormAction::RemoveSchemaFormStore { id: id.to_string() })
    }

    fn set_field(&mut self, id: &str, key: &str, result: ValidationResult) -> bool {
        self.record(FormAction::SetSchemaFormData {
            id: id.to_string(),
            key: key.to_string(),
            result,
        })
    }

    fn read_slice(&self, id: &str) -> Option<FormModel> {
        self.store.state().get(id).cloned()
    }
}

/// Renders into a `TestBackend` and returns the buffer
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    pub fn new(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("test backend never fails");
        Self { terminal }
    }

    pub fn render(&mut self, draw: impl FnOnce(&mut Frame)) -> &Buffer {
        self.terminal.draw(draw).expect("test backend never fails");
        self.terminal.backend().buffer()
    }

    /// Render and return the buffer's symbols, one line per row
    pub fn render_to_string_plain(&mut self, draw: impl FnOnce(&mut Frame)) -> String {
        let buffer = self.render(draw);
        buffer_to_string_plain(buffer)
    }
}

/// Buffer symbols without styling, one line per row
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

/// A key press with no modifiers
pub fn key(code: KeyCode) -> EventKind {
    EventKind::Key(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    })
}

/// A character key press with no modifiers
pub fn char_key(c: char) -> EventKind {
    key(KeyCode::Char(c))
}

/// A character key press with Ctrl held
pub fn ctrl_key(c: char) -> EventKind {
    EventKind::Key(KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    })
}

struct BlankField;

impl FieldComponent for BlankField {
    fn height(&self) -> u16 {
        1
    }

    fn render(
        &mut self,
        _frame: &mut Frame,
        _area: Rect,
        _props: FieldProps<'_>,
        _caps: &mut dyn FormCapabilities,
    ) {
    }
}

/// Field factory that draws nothing and registers nothing
pub fn blank_field() -> Box<dyn FieldComponent> {
    Box::new(BlankField)
}

/// Assert that an action matching a pattern was recorded.
///
/// ```ignore
/// assert_emitted!(actions, FormAction::CreateSchemaFormStore { .. });
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no action matching a pattern was recorded.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Count recorded actions matching a pattern.
#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}
