use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppMode, AppState, ViewMode};

use super::theme::Theme;

/// Footer widget showing keyboard hints, the search input and the selection count
pub struct Footer<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        match self.state.mode {
            AppMode::Browsing => {
                let mut hints = vec![("Tab", "Views"), ("Space", "Select"), ("/", "Search")];
                match self.state.view_mode {
                    ViewMode::RemoteRepos => {
                        hints.extend([("s", "Save"), ("L", "Link app")]);
                    }
                    ViewMode::SavedRepos => {
                        hints.extend([("i/I", "Import"), ("d/D", "Delete"), ("m", "Mode")]);
                    }
                    ViewMode::Challenges => {
                        hints.extend([("e", "Export"), ("E", "ZIP"), ("x", "Template")]);
                    }
                }
                hints.extend([("?", "Help"), ("q", "Quit")]);
                hints
            }
            AppMode::Help => vec![("Esc", "Close help"), ("q", "Close")],
            AppMode::Search => vec![("Enter", "Keep filter"), ("Esc", "Clear")],
            AppMode::Confirm => vec![("y", "Yes"), ("n", "Cancel")],
            AppMode::Running => vec![("q", "Quit")],
            AppMode::Report => vec![("\u{2191}\u{2193}", "Scroll"), ("Enter", "Close")],
            AppMode::Notice => vec![("Enter", "Close")],
        }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let key_style = Style::default()
            .fg(self.theme.fg)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg_dim);
        let sep_style = Style::default().fg(self.theme.border);

        let mut x = area.x + 1;

        if self.state.mode == AppMode::Search {
            let prompt = format!("/{}▏", self.state.search_input);
            buf.set_string(x, area.y, &prompt, Style::default().fg(self.theme.yellow));
            x += prompt.chars().count() as u16 + 2;
        }

        let hints = self.hints();
        for (i, (key, desc)) in hints.iter().enumerate() {
            if x + (key.len() + desc.len()) as u16 + 2 >= area.x + area.width {
                break;
            }
            buf.set_string(x, area.y, *key, key_style);
            x += key.chars().count() as u16 + 1;

            buf.set_string(x, area.y, *desc, desc_style);
            x += desc.len() as u16;

            if i < hints.len() - 1 {
                buf.set_string(x, area.y, "  │  ", sep_style);
                x += 5;
            }
        }

        // Selection count and delete mode on the right
        let mut right = Vec::new();
        if self.state.view_mode == ViewMode::SavedRepos {
            right.push(format!("mode: {}", self.state.delete_mode));
        }
        let selected = self.state.selection_count();
        if selected > 0 {
            right.push(format!("{selected} selected"));
        }
        if right.is_empty() {
            return;
        }
        let text = right.join("  ");
        let stats_style = Style::default()
            .fg(self.theme.purple)
            .add_modifier(Modifier::BOLD);
        let stats_x = (area.x + area.width).saturating_sub(text.len() as u16 + 1);
        if stats_x > x + 2 {
            buf.set_string(stats_x, area.y, &text, stats_style);
        }
    }
}
