use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::app::actions::Action;
use crate::app::{App, Focus};

/// Map a terminal event to an action. `None` means quit.
pub fn handle_event(event: &Event, app: &App) -> Option<Action> {
    match event {
        Event::Key(key) => {
            if key.kind == KeyEventKind::Release {
                return Some(Action::None);
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('c') => return None,
                    KeyCode::Char('r') => return Some(Action::Reload),
                    _ => return Some(Action::None),
                }
            }

            // The glob editor owns every printable key while focused
            if app.focus == Focus::Editor {
                let action = match key.code {
                    KeyCode::Esc | KeyCode::Tab => Action::FocusNext,
                    KeyCode::Enter | KeyCode::Up | KeyCode::Down => Action::InputSwitchField,
                    KeyCode::Backspace => Action::InputBackspace,
                    KeyCode::Char(c) => Action::InputChar(c),
                    _ => Action::None,
                };
                return Some(action);
            }

            let action = match key.code {
                KeyCode::Tab | KeyCode::BackTab => Action::FocusNext,
                KeyCode::Up => Action::CursorUp,
                KeyCode::Down => Action::CursorDown,
                KeyCode::Char(' ') => Action::ToggleContext,
                KeyCode::Delete | KeyCode::Char('x') => Action::RemoveFromContext,
                KeyCode::Enter | KeyCode::Right | KeyCode::Left => Action::ToggleFolder,
                KeyCode::Char('a') => Action::NextAgent,
                KeyCode::Char(c @ '1'..='9') => Action::ApplyPreset(c as usize - '1' as usize),
                KeyCode::Char('e') => Action::EditGlobs,
                KeyCode::Char('s') => Action::SaveAgent,
                KeyCode::Char('q') => return None,
                _ => Action::None,
            };
            Some(action)
        }
        Event::Paste(text) if app.focus == Focus::Editor => {
            Some(Action::InputPaste(text.replace(['\r', '\n'], " ")))
        }
        Event::Resize(..) => Some(Action::Redraw),
        _ => Some(Action::None),
    }
}
