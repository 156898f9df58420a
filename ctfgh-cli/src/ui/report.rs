use ctfgh_core::BatchSummary;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::Notice;

use super::layout::{centered_rect, truncate};
use super::theme::Theme;

/// Per-item outcomes of a finished batch
pub struct ReportView<'a> {
    summary: &'a BatchSummary,
    theme: &'a Theme,
    scroll: usize,
}

impl<'a> ReportView<'a> {
    pub fn new(summary: &'a BatchSummary, theme: &'a Theme) -> Self {
        Self {
            summary,
            theme,
            scroll: 0,
        }
    }

    /// First report line to show; clamped so the last page stays full
    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }
}

impl Widget for ReportView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.summary.lines();
        let dialog_area = centered_rect(76, lines.len() as u16 + 7, area);

        Clear.render(dialog_area, buf);

        let border = self.theme.outcome_color(!self.summary.has_failures());
        let block = Block::default()
            .title(format!(" {} complete ", self.summary.kind))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);
        if inner.height < 2 {
            return;
        }

        let max_w = inner.width as usize;
        buf.set_string(
            inner.x,
            inner.y,
            truncate(&self.summary.headline(), max_w),
            Style::default()
                .fg(self.theme.fg)
                .add_modifier(Modifier::BOLD),
        );

        // Headline, blank, lines, hint
        let room = inner.height.saturating_sub(3) as usize;
        let overflow = lines.len() > room;
        let shown = if overflow {
            room.saturating_sub(1)
        } else {
            lines.len()
        };
        let start = self.scroll.min(lines.len() - shown);
        let mut row = inner.y + 2;
        for line in lines.iter().skip(start).take(shown) {
            let color = if line.starts_with("[ok]") {
                self.theme.green
            } else if line.starts_with("[FAILED]") {
                self.theme.red
            } else {
                self.theme.fg_dim
            };
            buf.set_string(inner.x, row, truncate(line, max_w), Style::default().fg(color));
            row += 1;
        }
        if overflow && shown > 0 {
            buf.set_string(
                inner.x,
                row,
                truncate(
                    &format!(
                        "lines {}-{} of {}, \u{2191}\u{2193} to scroll",
                        start + 1,
                        start + shown,
                        lines.len()
                    ),
                    max_w,
                ),
                Style::default().fg(self.theme.fg_muted),
            );
        }

        let hint_y = inner.y + inner.height - 1;
        buf.set_string(
            inner.x,
            hint_y,
            "[Enter]",
            Style::default()
                .fg(self.theme.green)
                .add_modifier(Modifier::BOLD),
        );
        buf.set_string(inner.x + 8, hint_y, "Close", Style::default().fg(self.theme.fg));
    }
}

/// Result of a one-shot action, or an error
pub struct NoticeView<'a> {
    notice: &'a Notice,
    theme: &'a Theme,
}

impl<'a> NoticeView<'a> {
    pub fn new(notice: &'a Notice, theme: &'a Theme) -> Self {
        Self { notice, theme }
    }
}

/// Greedy word wrap
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

impl Widget for NoticeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 60u16;
        let text_width = width.saturating_sub(6) as usize;
        let lines = wrap(&self.notice.message, text_width.max(1));
        let dialog_area = centered_rect(width, lines.len() as u16 + 6, area);

        Clear.render(dialog_area, buf);

        let border = self.theme.outcome_color(!self.notice.is_error);
        let block = Block::default()
            .title(format!(" {} ", self.notice.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);
        if inner.height < 1 {
            return;
        }

        let text_style = if self.notice.is_error {
            Style::default().fg(self.theme.red)
        } else {
            Style::default().fg(self.theme.fg)
        };
        let max_rows = inner.height.saturating_sub(2) as usize;
        for (i, line) in lines.iter().take(max_rows).enumerate() {
            buf.set_string(
                inner.x,
                inner.y + i as u16,
                truncate(line, inner.width as usize),
                text_style,
            );
        }

        let hint_y = inner.y + inner.height - 1;
        buf.set_string(
            inner.x,
            hint_y,
            "[Enter]",
            Style::default()
                .fg(self.theme.green)
                .add_modifier(Modifier::BOLD),
        );
        buf.set_string(inner.x + 8, hint_y, "OK", Style::default().fg(self.theme.fg));
    }
}

#[cfg(test)]
mod tests {
    use ctfgh_core::{BatchKind, FileError, ItemKey, ItemOutcome};

    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut text = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn long_summary() -> BatchSummary {
        let outcomes = (1..=12)
            .map(|i| ItemOutcome {
                key: ItemKey::from(i as u64),
                label: format!("org/repo-{i}"),
                success: true,
                message: "Imported".to_string(),
                errors: if i == 12 {
                    vec![FileError {
                        file: "broken.yml".to_string(),
                        error: "bad yaml".to_string(),
                    }]
                } else {
                    Vec::new()
                },
            })
            .collect();
        BatchSummary {
            kind: BatchKind::Import,
            outcomes,
        }
    }

    #[test]
    fn test_report_scrolls_to_hidden_lines() {
        let theme = Theme::default();
        let summary = long_summary();
        let area = Rect::new(0, 0, 80, 14);

        let mut top = Buffer::empty(area);
        ReportView::new(&summary, &theme).render(area, &mut top);
        let text = buffer_text(&top);
        assert!(text.contains("org/repo-1:"));
        assert!(!text.contains("broken.yml"));
        assert!(text.contains("of 13"));

        let mut bottom = Buffer::empty(area);
        ReportView::new(&summary, &theme)
            .scroll(usize::MAX)
            .render(area, &mut bottom);
        let text = buffer_text(&bottom);
        assert!(text.contains("broken.yml: bad yaml"));
        assert!(text.contains("13 of 13"));
        assert!(!text.contains("org/repo-1:"));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("a\nb", 10), vec!["a", "b"]);
    }
}
