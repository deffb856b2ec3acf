//! Keyboard input dispatch: global keys, then the handler for the current step.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Step};

/// Handle a key event. Sets `app.running = false` to quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Global keys.
    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
    if ctrl_c || key.code == KeyCode::Char('q') {
        app.running = false;
        return;
    }

    match app.step {
        Step::Disclaimer => handle_disclaimer(app, key),
        Step::Symbol => handle_symbol(app, key),
        Step::Group => handle_group(app, key),
        Step::Chart => handle_chart(app, key),
    }
}

fn handle_disclaimer(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => app.accept_disclaimer(),
        KeyCode::Esc => app.running = false,
        _ => {}
    }
}

fn handle_symbol(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::Home | KeyCode::Char('g') => app.symbol_cursor = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.symbol_cursor = app.symbol_count().saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.select_symbol(),
        _ => {}
    }
}

fn handle_group(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char(c @ '1'..='9') => {
            let idx = c as usize - '1' as usize;
            if idx < app.group_count() {
                app.group_cursor = idx;
                app.select_group();
            }
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.select_group(),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => app.back(),
        _ => {}
    }
}

fn handle_chart(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('p') => app.cycle_period(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('s') => app.toggle_sell_markers(),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => app.back(),
        _ => {}
    }
}
