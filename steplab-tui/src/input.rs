//! Keyboard input dispatch: overlay first, then global keys, then buttons.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Button, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // 1. The help overlay consumes input until dismissed.
    if app.overlay == Overlay::Help {
        match key.code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('?') | KeyCode::Esc => app.toggle_help(),
            _ => {}
        }
        return;
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.quit();
            return;
        }
        KeyCode::Char('?') => {
            app.toggle_help();
            return;
        }
        _ => {}
    }

    // 3. Buttons.
    if let Some(button) = button_for(key.code) {
        app.press(button);
    }
}

fn button_for(code: KeyCode) -> Option<Button> {
    match code {
        KeyCode::Char('l') | KeyCode::Char('L') => Some(Button::Long),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Button::Short),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter | KeyCode::Char(' ') => {
            Some(Button::NextStep)
        }
        _ => None,
    }
}
