//! Input handling for TUI key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use walletdesk_core::ApiClient;

use crate::app::App;
use crate::pages::{LoginField, Request, Route, SettingsField};

/// Apply one key press. Backend work is returned, never awaited here.
pub fn handle_key(app: &mut App, api: &ApiClient, key: KeyEvent) -> Vec<Request> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Vec::new();
    }

    if app.route == Route::Login {
        return handle_login_key(app, key);
    }

    // Overlays swallow keys until answered.
    if app.notice().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return Vec::new();
    }
    if app.cancel_prompt.is_some() {
        return match key.code {
            KeyCode::Char('y' | 'Y') => app.answer_cancel(true),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => app.answer_cancel(false),
            _ => Vec::new(),
        };
    }

    if let Some(route) = function_key_route(key.code) {
        return app.navigate(api, route);
    }

    match app.route {
        Route::Orders if app.orders.tx_modal.is_some() => handle_tx_modal_key(app, key),
        Route::Settings => handle_settings_key(app, api, key, ctrl),
        Route::Orders | Route::Dashboard => handle_list_key(app, api, key),
        Route::Login => Vec::new(),
    }
}

const fn function_key_route(code: KeyCode) -> Option<Route> {
    match code {
        KeyCode::F(1) => Some(Route::Dashboard),
        KeyCode::F(2) => Some(Route::Orders),
        KeyCode::F(3) => Some(Route::Settings),
        _ => None,
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) -> Vec<Request> {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.toggle_focus();
        }
        KeyCode::Enter if app.login.focus == LoginField::Username => app.login.toggle_focus(),
        KeyCode::Enter => return app.submit_login(),
        KeyCode::Backspace => app.login.backspace(),
        KeyCode::Char(c) => app.login.insert_char(c),
        _ => {}
    }
    Vec::new()
}

fn handle_list_key(app: &mut App, api: &ApiClient, key: KeyEvent) -> Vec<Request> {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('L') => app.logout(api),
        KeyCode::Char('r') => return app.refresh(),
        KeyCode::Char('1') => return app.navigate(api, Route::Dashboard),
        KeyCode::Char('2') => return app.navigate(api, Route::Orders),
        KeyCode::Char('3') => return app.navigate(api, Route::Settings),
        _ if app.route == Route::Orders => return handle_orders_key(app, key),
        _ => {}
    }
    Vec::new()
}

fn handle_orders_key(app: &mut App, key: KeyEvent) -> Vec<Request> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.orders.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.orders.select_next(),
        KeyCode::Left | KeyCode::Char('h' | '[') => {
            return app.orders.prev_page().into_iter().collect();
        }
        KeyCode::Right | KeyCode::Char('l' | ']') => {
            return app.orders.next_page().into_iter().collect();
        }
        KeyCode::Char('c') => return app.confirm_selected(),
        KeyCode::Char('t') => app.open_tx_modal_for_selected(),
        KeyCode::Char('x') => app.request_cancel(),
        _ => {}
    }
    Vec::new()
}

fn handle_tx_modal_key(app: &mut App, key: KeyEvent) -> Vec<Request> {
    match key.code {
        KeyCode::Esc => app.orders.close_tx_modal(),
        KeyCode::Enter => return app.orders.submit_tx_modal().into_iter().collect(),
        KeyCode::Backspace => {
            if let Some(modal) = app.orders.tx_modal.as_mut() {
                modal.input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(modal) = app.orders.tx_modal.as_mut() {
                modal.input.push(c);
            }
        }
        _ => {}
    }
    Vec::new()
}

fn handle_settings_key(app: &mut App, api: &ApiClient, key: KeyEvent, ctrl: bool) -> Vec<Request> {
    let leaving = app.settings.focus;
    match key.code {
        KeyCode::Char('s') if ctrl => return app.settings.start_save().into_iter().collect(),
        KeyCode::F(5) => return app.refresh(),
        KeyCode::Esc => return app.navigate(api, Route::Dashboard),
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => app.settings.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.settings.focus_prev(),
        KeyCode::Backspace => app.settings.backspace(),
        KeyCode::Char(c) if !ctrl => app.settings.insert_char(c),
        _ => {}
    }
    if leaving == SettingsField::QrImageUrl && app.settings.focus != leaving {
        return app.settings.start_probe().into_iter().collect();
    }
    Vec::new()
}
