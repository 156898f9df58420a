use ctfgh_core::{BatchPhase, BatchProgress};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use super::bar_chart::{percent, render_bar};
use super::layout::centered_rect;
use super::progress::spinner;
use super::theme::Theme;

/// Progress overlay shown while a batch runs
pub struct BatchProgressView<'a> {
    progress: &'a BatchProgress,
    phase: BatchPhase,
    spinner_frame: usize,
    theme: &'a Theme,
}

impl<'a> BatchProgressView<'a> {
    pub fn new(
        progress: &'a BatchProgress,
        phase: BatchPhase,
        spinner_frame: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            progress,
            phase,
            spinner_frame,
            theme,
        }
    }
}

impl Widget for BatchProgressView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_rect(50, 10, area);

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.progress.kind.progress_label()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.yellow))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let text_style = Style::default().fg(self.theme.fg);
        let dim_style = Style::default().fg(self.theme.fg_dim);

        let mut row = inner.y;

        let status = match self.phase {
            BatchPhase::Running { index, total } => format!("Item {index} of {total}"),
            BatchPhase::Refreshing => "Refreshing lists".to_string(),
            BatchPhase::Idle | BatchPhase::Confirming => String::new(),
        };
        buf.set_string(
            inner.x,
            row,
            format!("{} {status}", spinner(self.spinner_frame)),
            Style::default().fg(self.theme.blue),
        );
        row += 1;

        let count_str = format!(
            "{} / {} completed",
            self.progress.completed, self.progress.total
        );
        buf.set_string(inner.x, row, &count_str, text_style);
        row += 1;

        let bar_width = (inner.width as usize).saturating_sub(2);
        let bar = render_bar(
            percent(self.progress.completed, self.progress.total),
            bar_width,
        );
        buf.set_string(
            inner.x,
            row,
            &bar,
            Style::default().fg(self.theme.progress_color(self.progress.failed)),
        );
        row += 2;

        if self.progress.failed > 0 {
            let fail_str = format!("{} failed", self.progress.failed);
            buf.set_string(
                inner.x,
                row,
                &fail_str,
                Style::default()
                    .fg(self.theme.red)
                    .add_modifier(Modifier::BOLD),
            );
        }

        let hint_y = inner.y + inner.height.saturating_sub(1);
        buf.set_string(
            inner.x,
            hint_y,
            "Requests run one at a time",
            dim_style,
        );
    }
}
