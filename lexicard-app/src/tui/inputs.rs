use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleReveal,
    Forgot,
    Vague,
    Remembered,
    Restart,
    None,
}

pub fn map_event(ev: Event) -> Action {
    if let Event::Key(KeyEvent { code, kind, .. }) = ev {
        if kind == KeyEventKind::Release {
            return Action::None;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char(' ') => Action::ToggleReveal,
            KeyCode::Char('1') | KeyCode::Char('f') => Action::Forgot,
            KeyCode::Char('2') | KeyCode::Char('v') => Action::Vague,
            KeyCode::Char('3') | KeyCode::Char('r') => Action::Remembered,
            KeyCode::Enter => Action::Restart,
            _ => Action::None,
        }
    } else {
        Action::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: KeyCode) -> Event {
        Event::Key(KeyEvent::new(c, KeyModifiers::NONE))
    }

    #[test]
    fn rating_keys() {
        assert_eq!(map_event(key(KeyCode::Char('1'))), Action::Forgot);
        assert_eq!(map_event(key(KeyCode::Char('v'))), Action::Vague);
        assert_eq!(map_event(key(KeyCode::Char('3'))), Action::Remembered);
        assert_eq!(map_event(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(map_event(key(KeyCode::Char('x'))), Action::None);
    }
}
