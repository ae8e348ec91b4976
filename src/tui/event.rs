use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Up,
    Down,
    ToggleCollapse,
    ToggleDone,
    Delete,
    Confirm,
    Cancel,
    CycleFilter,
    ToggleMode,
    Refresh,
    Continue,
}

/// Map a key press to an action. While a delete confirmation is pending,
/// only `y` confirms; anything else cancels.
pub fn handle_key(key: KeyEvent, confirming: bool) -> KeyAction {
    if confirming {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Confirm,
            _ => KeyAction::Cancel,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => KeyAction::Down,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::Up,
        KeyCode::Char(' ') => KeyAction::ToggleCollapse,
        KeyCode::Char('x') | KeyCode::Enter => KeyAction::ToggleDone,
        KeyCode::Char('d') => KeyAction::Delete,
        KeyCode::Char('f') => KeyAction::CycleFilter,
        KeyCode::Char('m') => KeyAction::ToggleMode,
        KeyCode::Char('r') => KeyAction::Refresh,
        _ => KeyAction::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn normal_bindings() {
        assert_eq!(handle_key(key('q'), false), KeyAction::Quit);
        assert_eq!(handle_key(key('j'), false), KeyAction::Down);
        assert_eq!(handle_key(key(' '), false), KeyAction::ToggleCollapse);
        assert_eq!(handle_key(key('x'), false), KeyAction::ToggleDone);
        assert_eq!(handle_key(key('f'), false), KeyAction::CycleFilter);
        assert_eq!(handle_key(key('z'), false), KeyAction::Continue);
    }

    #[test]
    fn confirmation_swallows_everything_but_y() {
        assert_eq!(handle_key(key('y'), true), KeyAction::Confirm);
        assert_eq!(handle_key(key('n'), true), KeyAction::Cancel);
        assert_eq!(handle_key(key('q'), true), KeyAction::Cancel);
    }
}
