use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::App;

/// Route a key press. Read-state writes and simulated comments run as
/// detached tasks: their handles are dropped here on purpose so the UI never
/// waits on the backend.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.toggle_dropdown(),
        KeyCode::Esc if app.dropdown_open => app.close_dropdown(),
        KeyCode::Esc | KeyCode::Char('h') => app.go_home(),
        KeyCode::Down | KeyCode::Char('j') if app.dropdown_open => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') if app.dropdown_open => app.select_prev(),
        KeyCode::Enter => {
            let _ = app.open_selected();
        }
        KeyCode::Char('a') => {
            let _ = app.mark_all_read();
        }
        KeyCode::Char('s') => app.toggle_sign_in(),
        KeyCode::Char('w') => app.switch_account(),
        KeyCode::Char('c') => {
            let _ = app.simulate_comment();
        }
        _ => {}
    }
}
