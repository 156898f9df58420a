use std::num::NonZeroUsize;

use crate::model::{ItemKey, Listed};
use crate::paginate::{PageCursor, paginate, total_pages};
use crate::selection::SelectionSet;

/// One visible row bound to the selection set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a, T> {
    pub item: &'a T,
    pub key: ItemKey,
    pub checked: bool,
    pub focused: bool,
}

/// Rows of the current page plus what the pagination bar needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a, T> {
    pub rows: Vec<Row<'a, T>>,
    pub page: usize,
    pub total_pages: usize,
    /// Items matching the filter
    pub filtered_len: usize,
    /// Items in the collection
    pub total_len: usize,
}

impl<T> ListView<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Per-view state: collection, filter, selection, page cursor and focused row
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    filter: String,
    needle: String,
    selection: SelectionSet,
    cursor: PageCursor,
    focus: usize,
}

impl<T: Listed> ListState<T> {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            items: Vec::new(),
            filter: String::new(),
            needle: String::new(),
            selection: SelectionSet::new(),
            cursor: PageCursor::new(page_size),
            focus: 0,
        }
    }

    /// Replace the collection wholesale after a fetch.
    ///
    /// Stale selections are dropped, the current page is kept when still
    /// valid and otherwise clamped to the last page.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.selection
            .reconcile(self.items.iter().map(|item| item.key()));
        self.clamp();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Change the search text. Always returns to the first page.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.needle = self.filter.trim().to_lowercase();
        self.cursor.reset();
        self.focus = 0;
    }

    /// Items matching the filter, in collection order
    pub fn filtered(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| item.matches(&self.needle))
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.cursor.page_size())
    }

    pub fn current_page(&self) -> usize {
        self.cursor.current()
    }

    /// Project the current page into rows
    pub fn view(&self) -> ListView<'_, T> {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.cursor.current(), self.cursor.page_size());
        let rows = page
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let key = item.key();
                Row {
                    item: *item,
                    checked: self.selection.contains(&key),
                    focused: i == self.focus,
                    key,
                }
            })
            .collect();

        ListView {
            rows,
            page: page.number,
            total_pages: page.total_pages,
            filtered_len: filtered.len(),
            total_len: self.items.len(),
        }
    }

    fn page_len(&self) -> usize {
        let filtered = self.filtered();
        paginate(&filtered, self.cursor.current(), self.cursor.page_size())
            .items
            .len()
    }

    fn clamp(&mut self) {
        let pages = self.total_pages();
        self.cursor.clamp(pages);
        self.focus = self.focus.min(self.page_len().saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        let pages = self.total_pages();
        if self.cursor.next(pages) {
            self.focus = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.cursor.prev() {
            self.focus = 0;
        }
    }

    pub fn focus_up(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    pub fn focus_down(&mut self) {
        if self.focus + 1 < self.page_len() {
            self.focus += 1;
        }
    }

    /// Item under the row cursor
    pub fn focused(&self) -> Option<&T> {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.cursor.current(), self.cursor.page_size());
        page.items.get(self.focus).copied()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn toggle(&mut self, key: ItemKey, checked: bool) {
        self.selection.toggle(key, checked);
    }

    pub fn flip_focused(&mut self) {
        if let Some(key) = self.focused().map(|item| item.key()) {
            self.selection.flip(key);
        }
    }

    /// Select every item matching the current filter
    pub fn select_all(&mut self) {
        let keys: Vec<ItemKey> = self.filtered().iter().map(|item| item.key()).collect();
        self.selection.select_all(keys);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected_items(&self) -> Vec<&T> {
        self.selection.ordered_in(&self.items)
    }

    /// Selected keys in collection order
    pub fn selected_keys(&self) -> Vec<ItemKey> {
        self.selected_items().iter().map(|item| item.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RemoteRepo;

    fn repo(id: u64, full_name: &str) -> RemoteRepo {
        RemoteRepo {
            id,
            name: full_name.rsplit('/').next().unwrap_or_default().to_string(),
            full_name: full_name.to_string(),
        }
    }

    fn page_size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn visible_ids(list: &ListState<RemoteRepo>) -> Vec<u64> {
        list.view().rows.iter().map(|r| r.item.id).collect()
    }

    #[test]
    fn test_two_repos_one_per_page() {
        let mut list = ListState::new(page_size(1));
        list.replace(vec![repo(1, "a/b"), repo(2, "a/c")]);

        assert_eq!(visible_ids(&list), vec![1]);
        list.next_page();
        assert_eq!(visible_ids(&list), vec![2]);
        list.next_page();
        assert_eq!(list.current_page(), 2);
        assert_eq!(visible_ids(&list), vec![2]);
    }

    #[test]
    fn test_filter_resets_page_and_matches_case_insensitively() {
        let mut list = ListState::new(page_size(1));
        list.replace(vec![repo(1, "Org/Web"), repo(2, "org/pwn"), repo(3, "org/web-2")]);
        list.next_page();
        assert_eq!(list.current_page(), 2);

        list.set_filter("WEB");
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.view().filtered_len, 2);
        assert_eq!(list.total_pages(), 2);
        assert_eq!(visible_ids(&list), vec![1]);
    }

    #[test]
    fn test_refresh_keeps_page_and_clamps_when_shrunk() {
        let mut list = ListState::new(page_size(2));
        list.replace((1..=6).map(|i| repo(i, &format!("o/r{i}"))).collect());
        list.next_page();
        list.next_page();
        assert_eq!(list.current_page(), 3);

        list.replace((1..=6).map(|i| repo(i, &format!("o/r{i}"))).collect());
        assert_eq!(list.current_page(), 3);

        list.replace((1..=3).map(|i| repo(i, &format!("o/r{i}"))).collect());
        assert_eq!(list.current_page(), 2);
        assert_eq!(visible_ids(&list), vec![3]);
    }

    #[test]
    fn test_selection_survives_refresh_minus_removed_items() {
        let mut list = ListState::new(page_size(10));
        list.replace(vec![repo(1, "a/b"), repo(2, "a/c"), repo(3, "a/d")]);
        list.toggle(ItemKey::from("a/b"), true);
        list.toggle(ItemKey::from("a/d"), true);

        list.replace(vec![repo(1, "a/b"), repo(2, "a/c")]);
        assert_eq!(list.selected_keys(), vec![ItemKey::from("a/b")]);
    }

    #[test]
    fn test_rows_reflect_selection_and_focus() {
        let mut list = ListState::new(page_size(10));
        list.replace(vec![repo(1, "a/b"), repo(2, "a/c")]);
        list.focus_down();
        list.flip_focused();

        let view = list.view();
        assert!(!view.rows[0].checked);
        assert!(view.rows[1].checked);
        assert!(view.rows[1].focused);
        assert_eq!(list.focused().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_focus_stays_within_page() {
        let mut list = ListState::new(page_size(2));
        list.replace(vec![repo(1, "a/a"), repo(2, "a/b"), repo(3, "a/c")]);
        list.focus_down();
        list.focus_down();
        assert_eq!(list.focused().map(|r| r.id), Some(2));

        list.next_page();
        assert_eq!(list.focused().map(|r| r.id), Some(3));
        list.focus_down();
        assert_eq!(list.focused().map(|r| r.id), Some(3));
        list.focus_up();
        list.focus_up();
        assert_eq!(list.focused().map(|r| r.id), Some(3));
    }

    #[test]
    fn test_select_all_respects_filter() {
        let mut list = ListState::new(page_size(1));
        list.replace(vec![repo(1, "a/web"), repo(2, "a/pwn"), repo(3, "b/web")]);
        list.set_filter("web");
        list.select_all();
        assert_eq!(
            list.selected_keys(),
            vec![ItemKey::from("a/web"), ItemKey::from("b/web")]
        );

        list.clear_selection();
        assert!(list.selection().is_empty());
    }

    #[test]
    fn test_empty_collection_has_one_empty_page() {
        let mut list: ListState<RemoteRepo> = ListState::new(page_size(4));
        list.replace(Vec::new());
        let view = list.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 1);
        assert!(!view.has_prev());
        assert!(!view.has_next());
        assert!(list.focused().is_none());
    }
}
