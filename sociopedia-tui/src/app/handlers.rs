use crate::app::state::{App, LoginField, Screen};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    log_key_event!(app.log_config, "Key {:?} on {:?}", key.code, app.current_screen);

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return Ok(());
    }

    if app.current_screen == Screen::Login {
        return handle_login_keys(app, key);
    }

    // Priority 1: Help modal
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.toggle_help();
        }
        return Ok(());
    }

    // Priority 2: Delete confirmation
    if app.delete_confirmation.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return Ok(());
    }

    // Priority 3: Comment composer, which takes every other key as text
    if app.composer.is_open() {
        match key.code {
            KeyCode::Esc => app.close_composer(),
            KeyCode::Enter => app.submit_composer(),
            _ => app.handle_composer_input(key),
        }
        return Ok(());
    }

    // Priority 4: Options dialog
    if app.options_dialog.is_some() {
        match key.code {
            KeyCode::Esc | KeyCode::Char('o') => app.options_dialog = None,
            KeyCode::Down | KeyCode::Char('j') => app.move_option(true),
            KeyCode::Up | KeyCode::Char('k') => app.move_option(false),
            KeyCode::Enter => app.choose_option(),
            _ => {}
        }
        return Ok(());
    }

    // Priority 5: Comment thread dialog
    if app.comment_dialog.open {
        match key.code {
            KeyCode::Esc | KeyCode::Char('v') => app.close_comment_dialog(),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_comments(true),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_comments(false),
            KeyCode::Char('c') => {
                app.close_comment_dialog();
                app.open_composer();
            }
            _ => {}
        }
        return Ok(());
    }

    handle_feed_keys(app, key)
}

fn handle_feed_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Down | KeyCode::Char('j') => app.next_post(),
        KeyCode::Up | KeyCode::Char('k') => app.previous_post(),
        KeyCode::Char('l') => app.like_selected(),
        KeyCode::Char('c') => app.open_composer(),
        KeyCode::Char('v') | KeyCode::Enter => app.open_comment_dialog(),
        KeyCode::Char('b') => app.bookmark_selected(),
        KeyCode::Char('f') => app.follow_selected(),
        KeyCode::Char('o') => app.open_options_dialog(),
        KeyCode::Char('d') => app.request_delete_selected(),
        KeyCode::Char('r') => app.feed_state.pending_load = true,
        KeyCode::Char('t') => app.cycle_color_scheme(),
        KeyCode::Char('L') => app.open_login(),
        _ => {}
    }
    Ok(())
}

fn handle_login_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.login_state.loading {
        return Ok(());
    }

    match key.code {
        KeyCode::Esc => app.skip_login(),
        KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
            app.login_state.focused = match app.login_state.focused {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
        }
        KeyCode::Enter => {
            if app.login_state.can_submit() {
                app.login_state.pending_submit = true;
            } else if app.login_state.focused == LoginField::Email {
                app.login_state.focused = LoginField::Password;
            } else {
                app.login_state.error = Some("Enter your email and password".to_string());
            }
        }
        KeyCode::Backspace => {
            app.login_state.focused_input().pop();
        }
        KeyCode::Char(c) => {
            app.login_state.focused_input().push(c);
            app.login_state.error = None;
        }
        _ => {}
    }
    Ok(())
}
