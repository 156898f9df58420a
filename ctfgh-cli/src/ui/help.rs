use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use super::layout::centered_rect;
use super::theme::Theme;

const HELP_ITEMS: [(&str, &str, bool); 36] = [
    ("", "Views", true),
    ("Tab", "Next view", false),
    ("S-Tab", "Previous view", false),
    ("r", "Reload current view", false),
    ("", "", false),
    ("", "Navigation", true),
    ("↑ k", "Move up", false),
    ("↓ j", "Move down", false),
    ("← h PgUp", "Previous page", false),
    ("→ l PgDn", "Next page", false),
    ("/", "Search", false),
    ("Esc", "Clear search", false),
    ("", "", false),
    ("", "Selection", true),
    ("Space", "Toggle focused item", false),
    ("a", "Select all matching", false),
    ("u", "Clear selection", false),
    ("", "", false),
    ("", "GitHub", true),
    ("s", "Save selected repositories", false),
    ("L", "Link GitHub installation", false),
    ("", "", false),
    ("", "Saved", true),
    ("i / I", "Import focused / selected", false),
    ("d / D", "Delete focused / selected", false),
    ("m", "Cycle delete mode", false),
    ("", "", false),
    ("", "Challenges", true),
    ("e", "Export focused as JSON", false),
    ("E", "Export selected as ZIP", false),
    ("x", "Download JSON template", false),
    ("", "", false),
    ("", "Other", true),
    ("?", "Toggle this help", false),
    ("y / n", "Answer dialogs", false),
    ("q Ctrl+C", "Quit", false),
];

/// Help overlay widget
pub struct HelpView<'a> {
    theme: &'a Theme,
}

impl<'a> HelpView<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let help_area = centered_rect(50, HELP_ITEMS.len() as u16 + 4, area);

        Clear.render(help_area, buf);

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.blue))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(help_area);
        block.render(help_area, buf);

        let key_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg);
        let section_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);

        for (i, (key, desc, is_section)) in HELP_ITEMS.iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }

            let y = inner.y + i as u16;

            if *is_section {
                buf.set_string(inner.x, y, *desc, section_style);
            } else if !key.is_empty() {
                buf.set_string(inner.x, y, format!("{key:12}"), key_style);
                buf.set_string(inner.x + 12, y, *desc, desc_style);
            }
        }
    }
}
