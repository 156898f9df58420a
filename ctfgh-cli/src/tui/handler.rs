use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, AppMode};

/// Map key events to actions based on current mode
pub fn handle_key(key: KeyEvent, mode: AppMode) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    match mode {
        AppMode::Help => handle_key_help(key),
        AppMode::Search => handle_key_search(key),
        AppMode::Confirm => handle_key_confirm(key),
        AppMode::Running => handle_key_running(key),
        AppMode::Report => handle_key_report(key),
        AppMode::Notice => handle_key_dialog(key),
        AppMode::Browsing => handle_key_browsing(key),
    }
}

fn handle_key_help(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::HideHelp,
        _ => Action::Tick,
    }
}

fn handle_key_search(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::SearchSubmit,
        KeyCode::Esc => Action::SearchCancel,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char(c) => Action::SearchInput(c),
        _ => Action::Tick,
    }
}

fn handle_key_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
        _ => Action::Tick,
    }
}

fn handle_key_running(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Tick,
    }
}

fn handle_key_report(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        _ => handle_key_dialog(key),
    }
}

fn handle_key_dialog(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('q') => {
            Action::CloseDialog
        }
        _ => Action::Tick,
    }
}

fn handle_key_browsing(key: KeyEvent) -> Action {
    match key.code {
        // Quit
        KeyCode::Char('q') => Action::Quit,

        // Views
        KeyCode::Tab => Action::NextView,
        KeyCode::BackTab => Action::PrevView,

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Action::PrevPage,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Action::NextPage,

        // Selection
        KeyCode::Char(' ') => Action::ToggleSelect,
        KeyCode::Char('a') => Action::SelectAll,
        KeyCode::Char('u') => Action::ClearSelection,

        // Search
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Esc => Action::ClearFilter,

        // Remote actions
        KeyCode::Char('s') => Action::SaveSelection,
        KeyCode::Char('i') => Action::ImportFocused,
        KeyCode::Char('I') => Action::ImportSelected,
        KeyCode::Char('d') => Action::DeleteFocused,
        KeyCode::Char('D') => Action::DeleteSelected,
        KeyCode::Char('m') => Action::CycleDeleteMode,
        KeyCode::Char('e') => Action::ExportFocused,
        KeyCode::Char('E') => Action::ExportSelected,
        KeyCode::Char('x') => Action::DownloadTemplate,
        KeyCode::Char('L') => Action::LinkInstallation,
        KeyCode::Char('r') => Action::Reload,

        // Help
        KeyCode::Char('?') => Action::ShowHelp,

        _ => Action::Tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_browsing_keys() {
        let mode = AppMode::Browsing;
        assert_eq!(handle_key(press(KeyCode::Tab), mode), Action::NextView);
        assert_eq!(handle_key(press(KeyCode::BackTab), mode), Action::PrevView);
        assert_eq!(handle_key(press(KeyCode::Char('j')), mode), Action::MoveDown);
        assert_eq!(handle_key(press(KeyCode::Right), mode), Action::NextPage);
        assert_eq!(handle_key(press(KeyCode::Char(' ')), mode), Action::ToggleSelect);
        assert_eq!(handle_key(press(KeyCode::Char('I')), mode), Action::ImportSelected);
        assert_eq!(handle_key(press(KeyCode::Char('i')), mode), Action::ImportFocused);
        assert_eq!(handle_key(press(KeyCode::Char('E')), mode), Action::ExportSelected);
    }

    #[test]
    fn test_search_captures_letters() {
        let mode = AppMode::Search;
        assert_eq!(handle_key(press(KeyCode::Char('q')), mode), Action::SearchInput('q'));
        assert_eq!(handle_key(press(KeyCode::Esc), mode), Action::SearchCancel);
        assert_eq!(handle_key(press(KeyCode::Enter), mode), Action::SearchSubmit);
    }

    #[test]
    fn test_confirm_keys() {
        let mode = AppMode::Confirm;
        assert_eq!(handle_key(press(KeyCode::Char('y')), mode), Action::Confirm);
        assert_eq!(handle_key(press(KeyCode::Char('n')), mode), Action::Cancel);
        assert_eq!(handle_key(press(KeyCode::Esc), mode), Action::Cancel);
        assert_eq!(handle_key(press(KeyCode::Char('d')), mode), Action::Tick);
    }

    #[test]
    fn test_running_ignores_actions() {
        let mode = AppMode::Running;
        assert_eq!(handle_key(press(KeyCode::Char('I')), mode), Action::Tick);
        assert_eq!(handle_key(press(KeyCode::Char('q')), mode), Action::Quit);
    }

    #[test]
    fn test_report_scrolls_but_notice_does_not() {
        assert_eq!(handle_key(press(KeyCode::Down), AppMode::Report), Action::MoveDown);
        assert_eq!(handle_key(press(KeyCode::Char('k')), AppMode::Report), Action::MoveUp);
        assert_eq!(handle_key(press(KeyCode::Enter), AppMode::Report), Action::CloseDialog);
        assert_eq!(handle_key(press(KeyCode::Down), AppMode::Notice), Action::Tick);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(key, AppMode::Search), Action::Quit);
        assert_eq!(handle_key(key, AppMode::Confirm), Action::Quit);
    }
}
