use std::num::NonZeroUsize;

/// Number of pages needed for `len` items, never less than one
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// A window into a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page
    pub items: &'a [T],
    /// 1-based page number
    pub number: usize,
    pub total_pages: usize,
    /// Index of the first item of the window within the full list
    pub offset: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slice out page `page` (1-based). Out-of-range pages give an empty window.
pub fn paginate<T>(items: &[T], page: usize, page_size: NonZeroUsize) -> Page<'_, T> {
    let size = page_size.get();
    let page = page.max(1);
    let start = (page - 1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());

    Page {
        items: &items[start..end],
        number: page,
        total_pages: total_pages(items.len(), page_size),
        offset: start,
    }
}

/// Current page plus fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: usize,
    page_size: NonZeroUsize,
}

impl PageCursor {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            current: 1,
            page_size,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Go back one page; no-op on the first page
    pub fn prev(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Go forward one page; no-op on the last page
    pub fn next(&mut self, total_pages: usize) -> bool {
        if self.current < total_pages {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Pull an out-of-range page back to the last valid one
    pub fn clamp(&mut self, total_pages: usize) {
        self.current = self.current.clamp(1, total_pages.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, size(10)), 1);
        assert_eq!(total_pages(1, size(10)), 1);
        assert_eq!(total_pages(10, size(10)), 1);
        assert_eq!(total_pages(11, size(10)), 2);
        assert_eq!(total_pages(9, size(4)), 3);
    }

    #[test]
    fn test_windows_cover_every_item_once() {
        for len in 0..40usize {
            let items: Vec<usize> = (0..len).collect();
            for page_size in 1..12usize {
                let ps = size(page_size);
                let pages = total_pages(len, ps);
                let mut seen = Vec::new();
                for page in 1..=pages {
                    let window = paginate(&items, page, ps);
                    assert!(window.items.len() <= page_size);
                    seen.extend_from_slice(window.items);
                }
                assert_eq!(seen, items, "len={len} page_size={page_size}");
            }
        }
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items = [1, 2, 3];
        let page = paginate(&items, 5, size(2));
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.offset, 3);
    }

    #[test]
    fn test_cursor_boundaries_do_not_wrap() {
        let mut cursor = PageCursor::new(size(1));
        assert!(!cursor.prev());
        assert_eq!(cursor.current(), 1);

        assert!(cursor.next(2));
        assert_eq!(cursor.current(), 2);
        assert!(!cursor.next(2));
        assert_eq!(cursor.current(), 2);
    }

    #[test]
    fn test_cursor_clamp_to_last_page() {
        let mut cursor = PageCursor::new(size(2));
        cursor.next(5);
        cursor.next(5);
        cursor.next(5);
        assert_eq!(cursor.current(), 4);

        cursor.clamp(2);
        assert_eq!(cursor.current(), 2);

        cursor.clamp(0);
        assert_eq!(cursor.current(), 1);
    }

    #[test]
    fn test_page_navigation_flags() {
        let items = [1, 2, 3];
        let first = paginate(&items, 1, size(2));
        assert!(!first.has_prev());
        assert!(first.has_next());
        let last = paginate(&items, 2, size(2));
        assert!(last.has_prev());
        assert!(!last.has_next());
    }
}
