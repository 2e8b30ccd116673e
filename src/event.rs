use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    PrevDay,
    NextDay,
    PrevWeek,
    NextWeek,
    PrevMonth,
    NextMonth,
    Today,
    NextBooking,
    ShowDetail,
    Close,
    Reload,
    ToggleHelp,
}

pub fn poll_event(timeout: Duration) -> color_eyre::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Wait up to `timeout` for a key press. Releases and repeats on platforms
/// that report them are skipped.
pub fn next_key_event(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    loop {
        match poll_event(timeout)? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    let action = match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Action::PrevDay,
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Action::NextDay,
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Action::PrevWeek,
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Action::NextWeek,
        (KeyCode::Char('['), _) | (KeyCode::PageUp, _) => Action::PrevMonth,
        (KeyCode::Char(']'), _) | (KeyCode::PageDown, _) => Action::NextMonth,
        (KeyCode::Char('t'), _) | (KeyCode::Home, _) => Action::Today,
        (KeyCode::Tab, _) => Action::NextBooking,
        (KeyCode::Enter, _) => Action::ShowDetail,
        (KeyCode::Esc, _) => Action::Close,
        (KeyCode::Char('r'), _) => Action::Reload,
        (KeyCode::Char('?'), _) => Action::ToggleHelp,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(action_for(key(KeyCode::Char('['))), Some(Action::PrevMonth));
        assert_eq!(action_for(key(KeyCode::PageDown)), Some(Action::NextMonth));
        assert_eq!(action_for(key(KeyCode::Home)), Some(Action::Today));
        assert_eq!(
            action_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(action_for(key(KeyCode::Char('x'))), None);
    }
}
