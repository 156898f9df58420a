use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::PendingConfirm;

use super::layout::{centered_rect, truncate};
use super::theme::Theme;

/// Batch confirmation dialog widget
pub struct ConfirmView<'a> {
    pending: &'a PendingConfirm,
    theme: &'a Theme,
}

impl<'a> ConfirmView<'a> {
    pub fn new(pending: &'a PendingConfirm, theme: &'a Theme) -> Self {
        Self { pending, theme }
    }
}

impl Widget for ConfirmView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // lines + blank + warning + blank + hints, plus border and padding
        let warning_lines = if self.pending.warning.is_some() { 2 } else { 0 };
        let content_lines = self.pending.lines.len() + 2 + warning_lines;
        let dialog_area = centered_rect(64, content_lines as u16 + 4, area);

        Clear.render(dialog_area, buf);

        let border = if self.pending.warning.is_some() {
            self.theme.red
        } else {
            self.theme.yellow
        };
        let block = Block::default()
            .title(format!(" {} ", self.pending.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let text_style = Style::default().fg(self.theme.fg);
        let item_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(self.theme.green)
            .add_modifier(Modifier::BOLD);

        let max_w = inner.width.saturating_sub(2) as usize;
        let mut row = inner.y;
        for line in &self.pending.lines {
            if row >= inner.y + inner.height.saturating_sub(1) {
                break;
            }
            let style = if line.starts_with("...") || line.contains(": ") {
                Style::default().fg(self.theme.fg_dim)
            } else {
                item_style
            };
            buf.set_string(inner.x + 1, row, truncate(line, max_w), style);
            row += 1;
        }

        if let Some(warning) = &self.pending.warning {
            row += 1;
            buf.set_string(
                inner.x,
                row,
                truncate(warning, max_w + 2),
                Style::default().fg(self.theme.red),
            );
        }

        // Action hints at bottom
        let hints_y = inner.y + inner.height.saturating_sub(1);
        buf.set_string(inner.x, hints_y, "[y]", key_style);
        buf.set_string(inner.x + 4, hints_y, "Yes, continue", text_style);
        buf.set_string(inner.x + 20, hints_y, "[n]", key_style);
        buf.set_string(inner.x + 24, hints_y, "Cancel", text_style);
    }
}
