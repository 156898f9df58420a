use ctfgh_core::{Challenge, ItemKey, ListView, Listed, RemoteRepo, SavedRepo};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::app::LoadState;

use super::layout::truncate;
use super::theme::Theme;

/// Extra right-hand columns of a row
pub trait RowColumns {
    fn columns(&self, theme: &Theme) -> Vec<(String, Color)>;

    /// Shown when the collection is empty
    fn empty_message() -> &'static str;
}

impl RowColumns for RemoteRepo {
    fn columns(&self, theme: &Theme) -> Vec<(String, Color)> {
        vec![(format!("#{}", self.id), theme.fg_muted)]
    }

    fn empty_message() -> &'static str {
        "No repositories visible to the GitHub installation"
    }
}

impl RowColumns for SavedRepo {
    fn columns(&self, theme: &Theme) -> Vec<(String, Color)> {
        vec![
            (format!("{:>24}", self.last_synced_display()), theme.fg_dim),
            (format!("{:>6}", self.import_label()), theme.teal),
        ]
    }

    fn empty_message() -> &'static str {
        "No saved repositories"
    }
}

impl RowColumns for Challenge {
    fn columns(&self, theme: &Theme) -> Vec<(String, Color)> {
        let (text, color) = if self.imported {
            ("Yes", theme.green)
        } else {
            ("No", theme.fg_muted)
        };
        vec![(format!("GitHub: {text:>3}"), color)]
    }

    fn empty_message() -> &'static str {
        "No challenges"
    }
}

/// One page of a collection with checkboxes
pub struct ItemList<'a, T> {
    view: &'a ListView<'a, T>,
    load: &'a LoadState,
    filter: &'a str,
    /// Row whose request is in flight, with its label
    in_flight: Option<(&'a ItemKey, &'static str)>,
    theme: &'a Theme,
}

impl<'a, T> ItemList<'a, T> {
    pub fn new(
        view: &'a ListView<'a, T>,
        load: &'a LoadState,
        filter: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            view,
            load,
            filter,
            in_flight: None,
            theme,
        }
    }

    pub fn with_in_flight(mut self, in_flight: Option<(&'a ItemKey, &'static str)>) -> Self {
        self.in_flight = in_flight;
        self
    }

    fn render_message(&self, area: Rect, buf: &mut Buffer, msg: &str, color: Color) {
        let msg = truncate(msg, area.width.saturating_sub(2) as usize);
        let x = area.x + area.width.saturating_sub(msg.chars().count() as u16) / 2;
        let y = area.y + area.height / 2;
        buf.set_string(x, y, &msg, Style::default().fg(color));
    }
}

impl<T: Listed + RowColumns> Widget for ItemList<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 30 {
            return;
        }

        if self.view.rows.is_empty() {
            match self.load {
                LoadState::Loading | LoadState::Idle if self.view.total_len == 0 => {
                    self.render_message(area, buf, "Loading...", self.theme.fg_dim);
                }
                LoadState::Failed(error) => {
                    self.render_message(area, buf, error, self.theme.red);
                }
                _ if !self.filter.is_empty() => {
                    let msg = format!("No matches for '{}'", self.filter);
                    self.render_message(area, buf, &msg, self.theme.fg_dim);
                }
                _ => self.render_message(area, buf, T::empty_message(), self.theme.fg_dim),
            }
            return;
        }

        // Page larger than the area: scroll so the focused row stays drawn
        let height = area.height as usize;
        let focused = self.view.rows.iter().position(|row| row.focused).unwrap_or(0);
        let skip = (focused + 1).saturating_sub(height);

        for (i, row) in self.view.rows.iter().skip(skip).take(height).enumerate() {
            let y = area.y + i as u16;
            let bg = if row.focused {
                self.theme.selection_bg
            } else if row.checked {
                self.theme.bg_highlight
            } else {
                self.theme.bg
            };
            let row_style = if row.focused {
                Style::default().bg(bg).fg(self.theme.selection_fg)
            } else {
                Style::default().bg(bg).fg(self.theme.fg)
            };

            // Clear the row
            buf.set_string(area.x, y, " ".repeat(area.width as usize), row_style);

            let mut x = area.x + 1;

            // Checkbox
            let (mark, mark_color) = if row.checked {
                ("[x] ", self.theme.purple)
            } else {
                ("[ ] ", self.theme.fg_muted)
            };
            let mark_style = if row.focused {
                row_style.add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(bg).fg(mark_color)
            };
            buf.set_string(x, y, mark, mark_style);
            x += 4;

            // Right-aligned columns, or the in-flight marker
            let in_flight = self
                .in_flight
                .filter(|(key, _)| **key == row.key)
                .map(|(_, label)| label);
            let columns = match in_flight {
                Some(label) => vec![(label.to_string(), self.theme.yellow)],
                None => row.item.columns(self.theme),
            };
            let columns_width: usize = columns.iter().map(|(t, _)| t.chars().count() + 2).sum();
            let right_x = (area.x + area.width).saturating_sub(columns_width as u16 + 1);

            // Name
            let max_name = right_x.saturating_sub(x + 1) as usize;
            let name = truncate(row.item.display_name(), max_name);
            buf.set_string(x, y, &name, row_style);

            let mut cx = right_x;
            for (text, color) in columns {
                let style = if row.focused {
                    row_style
                } else {
                    Style::default().bg(bg).fg(color)
                };
                buf.set_string(cx, y, &text, style);
                cx += text.chars().count() as u16 + 2;
            }
        }
    }
}

/// `‹ Prev  n / N  Next ›` with disabled ends dimmed
pub struct Pager<'a> {
    page: usize,
    total_pages: usize,
    filtered_len: usize,
    total_len: usize,
    theme: &'a Theme,
}

impl<'a> Pager<'a> {
    pub fn new<T>(view: &ListView<'_, T>, theme: &'a Theme) -> Self {
        Self {
            page: view.page,
            total_pages: view.total_pages,
            filtered_len: view.filtered_len,
            total_len: view.total_len,
            theme,
        }
    }
}

impl Widget for Pager<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 {
            return;
        }
        let enabled = Style::default().fg(self.theme.blue);
        let disabled = Style::default().fg(self.theme.border);

        let prev_style = if self.page > 1 { enabled } else { disabled };
        let next_style = if self.page < self.total_pages {
            enabled
        } else {
            disabled
        };

        let mut x = area.x + 1;
        buf.set_string(x, area.y, "‹ Prev", prev_style);
        x += 8;
        let counter = format!("{} / {}", self.page, self.total_pages);
        buf.set_string(x, area.y, &counter, Style::default().fg(self.theme.fg));
        x += counter.len() as u16 + 2;
        buf.set_string(x, area.y, "Next ›", next_style);

        let count = if self.filtered_len == self.total_len {
            format!("{} total", self.total_len)
        } else {
            format!("{} of {} match", self.filtered_len, self.total_len)
        };
        let count_x = (area.x + area.width).saturating_sub(count.len() as u16 + 1);
        buf.set_string(count_x, area.y, &count, Style::default().fg(self.theme.fg_dim));
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use ctfgh_core::ListState;

    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_rows_show_checkbox_and_columns() {
        let mut list = ListState::new(NonZeroUsize::new(4).unwrap());
        list.replace(vec![
            Challenge {
                id: 1,
                name: "warmup".to_string(),
                imported: true,
            },
            Challenge {
                id: 2,
                name: "heap".to_string(),
                imported: false,
            },
        ]);
        list.toggle(ItemKey::from(2), true);
        let view = list.view();
        let theme = Theme::default();
        let load = LoadState::Loaded;

        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        ItemList::new(&view, &load, "", &theme).render(area, &mut buf);
        let text = buffer_text(&buf);

        assert!(text.contains("[ ] warmup"));
        assert!(text.contains("[x] heap"));
        assert!(text.contains("GitHub: Yes"));
        assert!(text.contains("GitHub:  No"));
    }

    #[test]
    fn test_focused_row_stays_visible_in_short_area() {
        let mut list = ListState::new(NonZeroUsize::new(10).unwrap());
        list.replace(
            (1..=6)
                .map(|id| Challenge {
                    id,
                    name: format!("chal-{id}"),
                    imported: true,
                })
                .collect(),
        );
        for _ in 0..4 {
            list.focus_down();
        }
        let view = list.view();
        let theme = Theme::default();
        let load = LoadState::Loaded;

        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        ItemList::new(&view, &load, "", &theme).render(area, &mut buf);
        let text = buffer_text(&buf);

        assert!(text.contains("chal-5"));
        assert!(text.contains("chal-3"));
        assert!(!text.contains("chal-1 "));
        assert!(!text.contains("chal-6"));
    }

    #[test]
    fn test_in_flight_row_shows_progress_label() {
        let mut list = ListState::new(NonZeroUsize::new(4).unwrap());
        list.replace(vec![SavedRepo {
            id: 7,
            name: "chals".to_string(),
            full_name: "org/chals".to_string(),
            last_synced_at: None,
            selected: true,
        }]);
        let view = list.view();
        let theme = Theme::default();
        let load = LoadState::Loaded;
        let key = ItemKey::from(7);

        let area = Rect::new(0, 0, 60, 2);
        let mut buf = Buffer::empty(area);
        ItemList::new(&view, &load, "", &theme)
            .with_in_flight(Some((&key, "Importing...")))
            .render(area, &mut buf);

        assert!(buffer_text(&buf).contains("Importing..."));
    }

    #[test]
    fn test_pager_shows_position() {
        let mut list = ListState::new(NonZeroUsize::new(1).unwrap());
        list.replace(vec![
            RemoteRepo {
                id: 1,
                name: "a".to_string(),
                full_name: "org/a".to_string(),
            },
            RemoteRepo {
                id: 2,
                name: "b".to_string(),
                full_name: "org/b".to_string(),
            },
        ]);
        let view = list.view();
        let theme = Theme::default();

        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        Pager::new(&view, &theme).render(area, &mut buf);
        let text = buffer_text(&buf);

        assert!(text.contains("1 / 2"));
        assert!(text.contains("2 total"));
    }
}
