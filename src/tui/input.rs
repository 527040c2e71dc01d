//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, InputMode, Tab};

const PAGE: isize = 10;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Fetch now.
    Refresh,
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.show_quit_confirm {
        return handle_quit_confirm(state, key);
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::Filter => handle_filter_mode(state, key),
    }
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.show_quit_confirm = false;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = true;
            KeyAction::None
        }

        // Help popup swallows navigation while open
        KeyCode::Char('?') | KeyCode::Char('H') => {
            state.show_help = !state.show_help;
            state.help_scroll = 0;
            KeyAction::None
        }
        KeyCode::Esc if state.show_help => {
            state.show_help = false;
            KeyAction::None
        }
        KeyCode::Up | KeyCode::Char('k') if state.show_help => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') if state.show_help => {
            state.help_scroll = state.help_scroll.saturating_add(1);
            KeyAction::None
        }
        _ if state.show_help => KeyAction::None,

        KeyCode::Tab => {
            state.switch_tab(state.current_tab.next());
            KeyAction::None
        }
        KeyCode::BackTab => {
            state.switch_tab(state.current_tab.prev());
            KeyAction::None
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(tab) = c.to_digit(10).and_then(Tab::from_digit) {
                state.switch_tab(tab);
            }
            KeyAction::None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            state.scroll_by(-1);
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.scroll_by(1);
            KeyAction::None
        }
        KeyCode::PageUp => {
            state.scroll_by(-PAGE);
            KeyAction::None
        }
        KeyCode::PageDown => {
            state.scroll_by(PAGE);
            KeyAction::None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.scroll_to_top();
            KeyAction::None
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.scroll_to_bottom();
            KeyAction::None
        }

        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.paused = !state.paused;
            state.status_message = Some(if state.paused {
                "Polling paused".to_string()
            } else {
                "Polling resumed".to_string()
            });
            KeyAction::None
        }
        KeyCode::Char('c') => {
            if state.current_tab.posting_kind().is_some() {
                let selected = state.cycle_category();
                state.status_message = Some(format!(
                    "Category: {}",
                    selected.as_deref().unwrap_or("all")
                ));
            }
            KeyAction::None
        }
        KeyCode::Char('/') if state.current_tab.is_filterable() => {
            state.input_mode = InputMode::Filter;
            state.filter_input = state
                .tab_state(state.current_tab)
                .filter
                .unwrap_or_default();
            KeyAction::None
        }
        KeyCode::Esc => {
            state.status_message = None;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Esc => {
            // Cancel filter
            state.input_mode = InputMode::Normal;
            state.filter_input.clear();
            state.apply_filter_input();
            KeyAction::None
        }
        KeyCode::Enter => {
            // Already applied while typing
            state.input_mode = InputMode::Normal;
            KeyAction::None
        }
        KeyCode::Backspace => {
            state.filter_input.pop();
            state.apply_filter_input();
            KeyAction::None
        }
        KeyCode::Char(c) => {
            state.filter_input.push(c);
            state.apply_filter_input();
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardState;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(
            DashboardState::default(),
            "https://t.me/bot".into(),
            Duration::from_secs(30),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_asks_before_quitting() {
        let mut s = state();
        assert_eq!(handle_key(&mut s, key(KeyCode::Char('q'))), KeyAction::None);
        assert!(s.show_quit_confirm);
        assert_eq!(handle_key(&mut s, key(KeyCode::Esc)), KeyAction::None);
        assert!(!s.show_quit_confirm);
        handle_key(&mut s, key(KeyCode::Char('q')));
        assert_eq!(handle_key(&mut s, key(KeyCode::Enter)), KeyAction::Quit);
    }

    #[test]
    fn ctrl_c_quits_immediately() {
        let mut s = state();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut s, ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn digits_and_tab_switch_views() {
        let mut s = state();
        handle_key(&mut s, key(KeyCode::Char('4')));
        assert_eq!(s.current_tab, Tab::Messages);
        handle_key(&mut s, key(KeyCode::Tab));
        assert_eq!(s.current_tab, Tab::Stats);
        handle_key(&mut s, key(KeyCode::Tab));
        assert_eq!(s.current_tab, Tab::Overview);
        handle_key(&mut s, key(KeyCode::BackTab));
        assert_eq!(s.current_tab, Tab::Stats);
        handle_key(&mut s, key(KeyCode::Char('9')));
        assert_eq!(s.current_tab, Tab::Stats);
    }

    #[test]
    fn r_requests_refresh_and_p_toggles_pause() {
        let mut s = state();
        assert_eq!(handle_key(&mut s, key(KeyCode::Char('r'))), KeyAction::Refresh);
        handle_key(&mut s, key(KeyCode::Char('p')));
        assert!(s.paused);
        handle_key(&mut s, key(KeyCode::Char('p')));
        assert!(!s.paused);
    }

    #[test]
    fn filter_is_applied_while_typing_and_cleared_on_esc() {
        let mut s = state();
        s.current_tab = Tab::Offers;
        handle_key(&mut s, key(KeyCode::Char('/')));
        assert_eq!(s.input_mode, InputMode::Filter);
        for c in "rei".chars() {
            handle_key(&mut s, key(KeyCode::Char(c)));
        }
        assert_eq!(s.list_filter(Tab::Offers).text.as_deref(), Some("rei"));

        // typed 'q' is text, not quit
        handle_key(&mut s, key(KeyCode::Char('q')));
        assert!(!s.show_quit_confirm);

        handle_key(&mut s, key(KeyCode::Esc));
        assert_eq!(s.input_mode, InputMode::Normal);
        assert!(s.list_filter(Tab::Offers).text.is_none());
    }

    #[test]
    fn help_blocks_navigation() {
        let mut s = state();
        handle_key(&mut s, key(KeyCode::Char('?')));
        assert!(s.show_help);
        handle_key(&mut s, key(KeyCode::Char('2')));
        assert_eq!(s.current_tab, Tab::Overview);
        handle_key(&mut s, key(KeyCode::Char('j')));
        assert_eq!(s.help_scroll, 1);
        handle_key(&mut s, key(KeyCode::Esc));
        assert!(!s.show_help);
    }
}
