use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppState, LoadState, ViewMode};

use super::layout::truncate;
use super::progress::spinner;
use super::theme::Theme;

/// Header widget showing title, view tabs, server and load status
pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn status(&self) -> (String, Style) {
        let dim = Style::default().fg(self.theme.fg_dim);
        match self.state.load_state(self.state.view_mode) {
            LoadState::Loading => (
                format!("{} Loading...", spinner(self.state.spinner_frame)),
                Style::default().fg(self.theme.yellow),
            ),
            LoadState::Failed(_) => ("Load failed".to_string(), Style::default().fg(self.theme.red)),
            LoadState::Idle => (String::new(), dim),
            LoadState::Loaded if self.state.busy.is_busy() => (
                format!("{} Working...", spinner(self.state.spinner_frame)),
                Style::default().fg(self.theme.yellow),
            ),
            LoadState::Loaded => {
                let count = match self.state.view_mode {
                    ViewMode::RemoteRepos => self.state.remote.items().len(),
                    ViewMode::SavedRepos => self.state.saved.items().len(),
                    ViewMode::Challenges => self.state.challenges.items().len(),
                };
                (format!("{count} items"), dim)
            }
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        // Title
        let title_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x + 1, area.y, "CTFGH", title_style);
        buf.set_string(
            area.x + 7,
            area.y,
            "─",
            Style::default().fg(self.theme.border),
        );

        // Tabs
        let mut x = area.x + 9;
        for view in ViewMode::ALL {
            let label = format!(" {} ", view.title());
            let style = if view == self.state.view_mode {
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.fg_dim)
            };
            buf.set_string(x, area.y, &label, style);
            x += label.len() as u16 + 1;
        }

        // Status (right-aligned)
        let (status, status_style) = self.status();
        let status_x = (area.x + area.width).saturating_sub(status.chars().count() as u16 + 2);
        buf.set_string(status_x, area.y, &status, status_style);

        // Server URL between tabs and status
        let room = status_x.saturating_sub(x + 2) as usize;
        if room > 8 {
            let url = truncate(&self.state.server_url, room);
            buf.set_string(x + 1, area.y, &url, Style::default().fg(self.theme.fg_muted));
        }
    }
}
