//! Pagination layer.
//!
//! Tracks the current page (1-based) and page size over a filtered row count,
//! slices rows for display, and produces the page-number bar. The current page
//! is clamped whenever the row count shrinks, so a filter that removes rows
//! never leaves the table on an empty, out-of-range page.

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::{KeyMsg, Msg};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page bars with at most this many pages list every page.
pub const MAX_UNCOLLAPSED_PAGES: usize = 7;

/// One entry of the page-number bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A clickable page number (1-based).
    Page(usize),
    /// A gap of one or more hidden pages.
    Ellipsis,
}

/// Page-number bar for `current` of `total` pages.
///
/// Up to [`MAX_UNCOLLAPSED_PAGES`] pages are all listed. Beyond that the bar
/// always shows the first and last page and a window around the current page,
/// with an ellipsis standing in for each gap, for seven entries in total.
///
/// ```rust
/// use bubbletea_datatable::paginator::{page_numbers, PageItem::{Ellipsis, Page}};
///
/// assert_eq!(page_numbers(1, 3), vec![Page(1), Page(2), Page(3)]);
/// assert_eq!(
///     page_numbers(10, 20),
///     vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)]
/// );
/// ```
pub fn page_numbers(current: usize, total: usize) -> Vec<PageItem> {
    if total <= MAX_UNCOLLAPSED_PAGES {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let mut items = vec![PageItem::Page(1)];

    if current <= 4 {
        items.extend((2..=5).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
    } else if current >= total - 3 {
        items.push(PageItem::Ellipsis);
        items.extend((total - 4..total).map(PageItem::Page));
    } else {
        items.push(PageItem::Ellipsis);
        items.extend((current - 1..=current + 1).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
    }

    items.push(PageItem::Page(total));
    items
}

/// Key bindings for page navigation.
#[derive(Debug, Clone)]
pub struct PaginatorKeyMap {
    /// Previous page.
    pub prev_page: key::Binding,
    /// Next page.
    pub next_page: key::Binding,
    /// First page.
    pub first_page: key::Binding,
    /// Last page.
    pub last_page: key::Binding,
}

impl Default for PaginatorKeyMap {
    fn default() -> Self {
        Self {
            prev_page: key::new_binding(vec![
                key::with_keys_str(&["pgup", "["]),
                key::with_help("pgup/[", "prev page"),
            ]),
            next_page: key::new_binding(vec![
                key::with_keys_str(&["pgdown", "]"]),
                key::with_help("pgdn/]", "next page"),
            ]),
            first_page: key::new_binding(vec![
                key::with_keys_str(&["home"]),
                key::with_help("home", "first page"),
            ]),
            last_page: key::new_binding(vec![
                key::with_keys_str(&["end"]),
                key::with_help("end", "last page"),
            ]),
        }
    }
}

impl KeyMapTrait for PaginatorKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev_page, &self.next_page]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![
            &self.prev_page,
            &self.next_page,
            &self.first_page,
            &self.last_page,
        ]]
    }
}

/// Pagination state.
///
/// ```rust
/// use bubbletea_datatable::paginator::Model;
///
/// let mut paginator = Model::new().with_page_size(10).with_total_items(95);
/// assert_eq!(paginator.total_pages(), 10);
///
/// paginator.go_to(10);
/// assert_eq!(paginator.slice_bounds(95), (90, 95));
///
/// // A filter shrinks the dataset: the page is clamped into range.
/// paginator.set_total_items(25);
/// assert_eq!(paginator.page(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    page: usize,
    page_size: usize,
    total_items: usize,
    /// Key bindings.
    pub keymap: PaginatorKeyMap,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_items: 0,
            keymap: PaginatorKeyMap::default(),
        }
    }
}

impl Model {
    /// Creates a paginator on page 1 with the default page size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size (builder). Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    /// Sets the item count (builder).
    pub fn with_total_items(mut self, items: usize) -> Self {
        self.set_total_items(items);
        self
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of items being paginated.
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// `ceil(total_items / page_size)`; zero when there are no items.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Changes the page size and clamps the current page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp();
    }

    /// Updates the item count and clamps the current page.
    pub fn set_total_items(&mut self, items: usize) {
        self.total_items = items;
        self.clamp();
    }

    /// Moves to `page`, clamped into `1..=total_pages`.
    pub fn go_to(&mut self, page: usize) {
        self.page = page;
        self.clamp();
    }

    /// Back to the first page.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Previous page; no-op on the first page.
    pub fn prev_page(&mut self) {
        if !self.on_first_page() {
            self.page -= 1;
        }
    }

    /// Next page; no-op on the last page.
    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    /// Returns true on the first page.
    pub fn on_first_page(&self) -> bool {
        self.page <= 1
    }

    /// Returns true on the last page (or when there are no pages).
    pub fn on_last_page(&self) -> bool {
        self.page >= self.total_pages()
    }

    /// Slice bounds `[start, end)` of the current page over `len` items.
    pub fn slice_bounds(&self, len: usize) -> (usize, usize) {
        let start = ((self.page - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        (start, end)
    }

    /// The current page's slice of `items`.
    pub fn paginate<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let (start, end) = self.slice_bounds(items.len());
        &items[start..end]
    }

    /// Page-number bar for the current state.
    pub fn page_numbers(&self) -> Vec<PageItem> {
        page_numbers(self.page, self.total_pages())
    }

    /// Handles page navigation keys. Returns true if the page changed.
    pub fn update(&mut self, msg: &Msg) -> bool {
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return false;
        };
        self.handle_key(key_msg)
    }

    pub(crate) fn handle_key(&mut self, key_msg: &KeyMsg) -> bool {
        let before = self.page;
        if self.keymap.next_page.matches(key_msg) {
            self.next_page();
        } else if self.keymap.prev_page.matches(key_msg) {
            self.prev_page();
        } else if self.keymap.first_page.matches(key_msg) {
            self.reset();
        } else if self.keymap.last_page.matches(key_msg) {
            self.go_to(self.total_pages());
        }
        before != self.page
    }

    /// Renders the page bar, e.g. `‹ 1 … 9 [10] 11 … 20 ›`.
    pub fn view(&self) -> String {
        let mut parts = vec!["‹".to_string()];
        for item in self.page_numbers() {
            parts.push(match item {
                PageItem::Page(n) if n == self.page => format!("[{n}]"),
                PageItem::Page(n) => n.to_string(),
                PageItem::Ellipsis => "…".to_string(),
            });
        }
        parts.push("›".to_string());
        parts.join(" ")
    }

    fn clamp(&mut self) {
        self.page = self.page.clamp(1, self.total_pages().max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis, Page};
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use proptest::prelude::*;

    #[test]
    fn test_page_numbers_small() {
        assert_eq!(page_numbers(1, 0), vec![]);
        assert_eq!(page_numbers(1, 1), vec![Page(1)]);
        assert_eq!(
            page_numbers(4, 7),
            (1..=7).map(Page).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_page_numbers_near_edges() {
        assert_eq!(
            page_numbers(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(4, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(7, 10),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
        assert_eq!(
            page_numbers(10, 10),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_page_numbers_middle() {
        assert_eq!(
            page_numbers(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_slicing() {
        let items: Vec<u32> = (1..=25).collect();
        let mut p = Model::new().with_page_size(10).with_total_items(items.len());
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.paginate(&items), &items[0..10]);
        p.go_to(3);
        assert_eq!(p.paginate(&items), &items[20..25]);
        p.go_to(99);
        assert_eq!(p.page(), 3);
        p.go_to(0);
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_clamp_when_items_shrink() {
        let mut p = Model::new().with_page_size(10).with_total_items(100);
        p.go_to(8);
        p.set_total_items(15);
        assert_eq!(p.page(), 2);
        p.set_total_items(0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.total_pages(), 0);
        assert_eq!(p.slice_bounds(0), (0, 0));
    }

    #[test]
    fn test_navigation_bounds() {
        let mut p = Model::new().with_page_size(5).with_total_items(12);
        p.prev_page();
        assert_eq!(p.page(), 1);
        p.next_page();
        p.next_page();
        p.next_page();
        assert_eq!(p.page(), 3);
        assert!(p.on_last_page());
    }

    #[test]
    fn test_key_navigation() {
        let mut p = Model::new().with_page_size(5).with_total_items(50);
        let key = |code| -> Msg {
            Box::new(KeyMsg {
                key: code,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert!(p.update(&key(KeyCode::PageDown)));
        assert_eq!(p.page(), 2);
        assert!(p.update(&key(KeyCode::End)));
        assert_eq!(p.page(), 10);
        assert!(!p.update(&key(KeyCode::PageDown)));
        assert!(p.update(&key(KeyCode::Home)));
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_view() {
        let mut p = Model::new().with_page_size(1).with_total_items(20);
        p.go_to(10);
        assert_eq!(p.view(), "‹ 1 … 9 [10] 11 … 20 ›");
    }

    proptest! {
        #[test]
        fn test_page_always_in_range(
            page_size in 1usize..50,
            items in 0usize..1000,
            page in 0usize..200,
        ) {
            let mut p = Model::new().with_page_size(page_size).with_total_items(items);
            p.go_to(page);
            prop_assert!(p.page() >= 1);
            prop_assert!(p.page() <= p.total_pages().max(1));
            let (start, end) = p.slice_bounds(items);
            prop_assert!(start <= end && end <= items);
            if items > 0 {
                prop_assert!(end > start);
            }
        }

        #[test]
        fn test_page_bar_shape(total in 1usize..200, current in 1usize..200) {
            let bar = page_numbers(current, total);
            prop_assert_eq!(bar.len(), total.min(7));
            prop_assert_eq!(bar[0], PageItem::Page(1));
            prop_assert_eq!(*bar.last().unwrap(), PageItem::Page(total));
            if current <= total {
                prop_assert!(bar.contains(&PageItem::Page(current)));
            }
        }
    }
}
