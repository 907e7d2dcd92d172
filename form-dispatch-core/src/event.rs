//! Input events routed to a form's renderer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

/// The event payload handed to renderers and fields
#[derive(Debug, Clone)]
pub enum EventKind {
    /// Keyboard event
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Scroll event with position and delta
    Scroll { column: u16, row: u16, delta: isize },
    /// Terminal resize
    Resize(u16, u16),
}

impl EventKind {
    /// Convert a crossterm event, dropping kinds forms never react to
    /// (focus, paste, key releases)
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(key) if key.kind != KeyEventKind::Release => {
                Some(EventKind::Key(key))
            }
            crossterm::event::Event::Mouse(mouse) => Some(match mouse.kind {
                MouseEventKind::ScrollDown => EventKind::Scroll {
                    column: mouse.column,
                    row: mouse.row,
                    delta: 1,
                },
                MouseEventKind::ScrollUp => EventKind::Scroll {
                    column: mouse.column,
                    row: mouse.row,
                    delta: -1,
                },
                _ => EventKind::Mouse(mouse),
            }),
            crossterm::event::Event::Resize(w, h) => Some(EventKind::Resize(w, h)),
            _ => None,
        }
    }

    /// The key event, if this is one
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            EventKind::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Whether this is a press of `code`, ignoring modifiers
    pub fn is_key(&self, code: KeyCode) -> bool {
        self.key().is_some_and(|key| key.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyEventState, KeyModifiers};

    #[test]
    fn test_key_conversion() {
        let key = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        };

        let kind = EventKind::from_crossterm(Event::Key(key)).unwrap();
        assert!(kind.is_key(KeyCode::Char('a')));
        assert!(!kind.is_key(KeyCode::Enter));
    }

    #[test]
    fn test_key_release_is_dropped() {
        let key = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::empty(),
        };

        assert!(EventKind::from_crossterm(Event::Key(key)).is_none());
    }

    #[test]
    fn test_scroll_conversion() {
        let scroll_down = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 10,
            row: 20,
            modifiers: KeyModifiers::NONE,
        };

        match EventKind::from_crossterm(Event::Mouse(scroll_down)) {
            Some(EventKind::Scroll { column, row, delta }) => {
                assert_eq!(column, 10);
                assert_eq!(row, 20);
                assert_eq!(delta, 1);
            }
            other => panic!("Expected Scroll event, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_conversion() {
        let kind = EventKind::from_crossterm(Event::Resize(80, 24));
        assert!(matches!(kind, Some(EventKind::Resize(80, 24))));
        assert!(EventKind::from_crossterm(Event::FocusGained).is_none());
    }
}
