//! The paged window over a collection.

use super::{
    ChangeKind, CollectionChange, CollectionObserver, PagerConfig, PaginationEvent, ResetPolicy,
    ResetReason,
};
use serde::Serialize;
use std::fmt;
use std::ops::{Range, RangeInclusive};
use tracing::{debug, warn};

type Callback = Box<dyn Fn(&PaginationEvent) + Send + Sync>;

/// Page state plus clamped navigation over a collection of known length.
///
/// Pages are 1-based. The view always satisfies
/// `1 <= current_page <= total_pages()`, where an empty collection still has
/// one (empty) page.
pub struct PagedCollectionView {
    /// Current page (1-based)
    current_page: usize,

    /// Items per page, always one of the configured options
    page_size: usize,

    /// Collection length as of the last observed change
    total_items: usize,

    config: PagerConfig,

    callbacks: Vec<Callback>,
}

/// Snapshot of where the view is, for status lines and JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// 1-based number of the first visible item, 0 when nothing is visible
    pub first_item: usize,
    /// 1-based number of the last visible item, 0 when nothing is visible
    pub last_item: usize,
}

impl PagedCollectionView {
    /// Create a view on page 1 of an empty collection
    pub fn new(config: PagerConfig) -> Self {
        Self {
            current_page: 1,
            page_size: config.default_page_size.max(1),
            total_items: 0,
            config,
            callbacks: Vec::new(),
        }
    }

    /// Get the current page (1-based)
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Get the current page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Get the collection length the view is paging over
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Get the total number of pages, never less than one
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page == self.total_pages()
    }

    /// Add an event callback
    pub fn add_callback<F>(&mut self, callback: F)
    where
        F: Fn(&PaginationEvent) + Send + Sync + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Select a new page size and go back to page 1.
    ///
    /// Sizes outside the configured options are ignored and `false` is
    /// returned.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !self.config.allows(size) {
            warn!(
                size,
                options = ?self.config.page_size_options,
                "Ignoring page size outside the allowed options"
            );
            return false;
        }

        let old_size = self.page_size;
        self.page_size = size;
        self.current_page = 1;

        debug!(old_size, new_size = size, "Page size changed");
        self.emit_event(PaginationEvent::PageSizeChanged {
            old_size,
            new_size: size,
            total_pages: self.total_pages(),
        });
        true
    }

    /// Go to `page`, clamped into `1..=total_pages()`. Returns the page landed on.
    pub fn go_to(&mut self, page: i64) -> usize {
        let last = i64::try_from(self.total_pages()).unwrap_or(i64::MAX);
        let new_page = page.clamp(1, last) as usize;
        let old_page = self.current_page;

        if old_page != new_page {
            self.current_page = new_page;
            debug!(old_page, new_page, "Page changed");
            self.emit_event(PaginationEvent::PageChanged { old_page, new_page });
        }

        new_page
    }

    /// Go to the first page
    pub fn first_page(&mut self) -> usize {
        self.go_to(1)
    }

    /// Go to the previous page, staying on page 1 if already there
    pub fn previous_page(&mut self) -> usize {
        self.go_to(self.current_page as i64 - 1)
    }

    /// Go to the next page, staying on the last page if already there
    pub fn next_page(&mut self) -> usize {
        self.go_to(self.current_page as i64 + 1)
    }

    /// Go to the last page
    pub fn last_page(&mut self) -> usize {
        self.go_to(self.total_pages() as i64)
    }

    /// Index range of the current page within the collection
    pub fn page_range(&self) -> Range<usize> {
        let start = self.offset().min(self.total_items);
        let end = start.saturating_add(self.page_size).min(self.total_items);
        start..end
    }

    /// The items of the current page. Empty when the page starts past the end.
    pub fn visible_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset();
        let end = start.saturating_add(self.page_size).min(items.len());
        items.get(start..end).unwrap_or_default()
    }

    /// Page numbers to show around the current page, at most `max_numbers` of them
    pub fn page_window(&self, max_numbers: usize) -> RangeInclusive<usize> {
        let total = self.total_pages();
        let width = max_numbers.clamp(1, total);
        let start = self
            .current_page
            .saturating_sub(width / 2)
            .clamp(1, total + 1 - width);
        start..=start + width - 1
    }

    pub fn summary(&self) -> PageSummary {
        let range = self.page_range();
        let (first_item, last_item) = if range.is_empty() {
            (0, 0)
        } else {
            (range.start + 1, range.end)
        };

        PageSummary {
            current_page: self.current_page,
            total_pages: self.total_pages(),
            page_size: self.page_size,
            total_items: self.total_items,
            first_item,
            last_item,
        }
    }

    fn offset(&self) -> usize {
        (self.current_page - 1).saturating_mul(self.page_size)
    }

    fn reset(&mut self, reason: ResetReason) {
        let previous_page = self.current_page;
        self.current_page = 1;
        debug!(previous_page, ?reason, "Page reset");
        self.emit_event(PaginationEvent::Reset {
            previous_page,
            reason,
        });
    }

    /// Emit an event to all callbacks
    fn emit_event(&self, event: PaginationEvent) {
        for callback in &self.callbacks {
            callback(&event);
        }
    }
}

impl CollectionObserver for PagedCollectionView {
    fn collection_changed(&mut self, change: &CollectionChange) {
        self.total_items = change.current_len;

        let resized = change.previous_len != change.current_len;
        let reason = match change.kind {
            _ if resized => Some(ResetReason::CollectionResized),
            ChangeKind::Replaced if self.config.reset_policy == ResetPolicy::OnAnyChange => {
                Some(ResetReason::CollectionReplaced)
            }
            _ => None,
        };

        if let Some(reason) = reason {
            self.reset(reason);
        }
    }
}

impl Default for PagedCollectionView {
    fn default() -> Self {
        Self::new(PagerConfig::default())
    }
}

impl fmt::Debug for PagedCollectionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedCollectionView")
            .field("current_page", &self.current_page)
            .field("page_size", &self.page_size)
            .field("total_items", &self.total_items)
            .field("config", &self.config)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn view_over(len: usize, page_size: usize) -> PagedCollectionView {
        let mut view = PagedCollectionView::new(PagerConfig::new().with_page_size(page_size));
        view.collection_changed(&CollectionChange {
            previous_len: 0,
            current_len: len,
            kind: ChangeKind::Replaced,
        });
        view
    }

    fn resize(view: &mut PagedCollectionView, len: usize) {
        let previous_len = view.total_items();
        view.collection_changed(&CollectionChange {
            previous_len,
            current_len: len,
            kind: ChangeKind::Replaced,
        });
    }

    #[test]
    fn test_view_creation() {
        let view = PagedCollectionView::default();
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.page_size(), 20);
        assert_eq!(view.total_pages(), 1);
    }

    #[test]
    fn test_total_pages() {
        let cases = [
            (0, 10, 1),
            (1, 10, 1),
            (10, 10, 1),
            (11, 10, 2),
            (25, 10, 3),
            (100, 20, 5),
        ];
        for (len, size, expected) in cases {
            assert_eq!(
                view_over(len, size).total_pages(),
                expected,
                "len={len} size={size}"
            );
        }
    }

    #[test]
    fn test_twenty_five_items_in_pages_of_ten() {
        let items: Vec<usize> = (0..25).collect();
        let mut view = view_over(items.len(), 10);

        assert_eq!(view.visible_slice(&items), &items[0..10]);
        view.next_page();
        assert_eq!(view.visible_slice(&items), &items[10..20]);
        view.next_page();
        assert_eq!(view.visible_slice(&items), &items[20..25]);

        view.first_page();
        assert_eq!(view.go_to(5), 3);
        assert_eq!(view.previous_page(), 2);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut view = view_over(25, 10);
        assert_eq!(view.go_to(0), 1);
        assert_eq!(view.go_to(-7), 1);
        assert_eq!(view.go_to(4), 3);
        assert_eq!(view.go_to(i64::MAX), 3);
        assert_eq!(view.go_to(2), 2);
    }

    #[test]
    fn test_navigation_stops_at_bounds() {
        let mut view = view_over(30, 10);
        assert_eq!(view.previous_page(), 1);
        assert_eq!(view.last_page(), 3);
        assert_eq!(view.next_page(), 3);
        assert!(view.is_last_page());
        assert_eq!(view.first_page(), 1);
        assert!(view.is_first_page());
    }

    #[test]
    fn test_empty_collection() {
        let items: Vec<u32> = Vec::new();
        let mut view = view_over(0, 10);
        assert_eq!(view.total_pages(), 1);
        assert!(view.visible_slice(&items).is_empty());
        assert_eq!(view.next_page(), 1);
        assert_eq!(view.last_page(), 1);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.summary().first_item, 0);
    }

    #[test]
    fn test_slice_lengths() {
        let items: Vec<usize> = (0..47).collect();
        let mut view = view_over(items.len(), 10);
        let total = view.total_pages();
        for page in 1..=total {
            view.go_to(page as i64);
            let len = view.visible_slice(&items).len();
            if page < total {
                assert_eq!(len, 10);
            } else {
                assert_eq!(len, 7);
            }
        }
    }

    #[test]
    fn test_slice_out_of_range_is_empty() {
        // The view believes there are more items than the slice it is handed.
        let mut view = view_over(30, 10);
        view.last_page();
        let short: Vec<u8> = vec![1, 2, 3];
        assert!(view.visible_slice(&short).is_empty());

        let partial: Vec<u8> = (0..25).collect();
        assert_eq!(view.visible_slice(&partial).len(), 5);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut view = view_over(100, 20);
        view.go_to(3);
        assert!(view.set_page_size(10));
        assert_eq!(view.page_size(), 10);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 10);

        view.go_to(4);
        assert!(view.set_page_size(10));
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_page_size_outside_options_is_ignored() {
        let mut view = view_over(100, 20);
        view.go_to(2);
        assert!(!view.set_page_size(15));
        assert!(!view.set_page_size(0));
        assert_eq!(view.page_size(), 20);
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn test_shrinking_collection_resets_page() {
        let mut view = view_over(25, 10);
        view.go_to(2);
        resize(&mut view, 5);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 1);
    }

    #[test]
    fn test_growing_collection_resets_page() {
        let mut view = view_over(25, 10);
        view.go_to(3);
        resize(&mut view, 26);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_same_length_replacement_follows_policy() {
        let mut view = view_over(25, 10);
        view.go_to(2);
        resize(&mut view, 25);
        assert_eq!(view.current_page(), 2);

        let mut strict = PagedCollectionView::new(
            PagerConfig::new()
                .with_page_size(10)
                .with_reset_policy(ResetPolicy::OnAnyChange),
        );
        resize(&mut strict, 25);
        strict.go_to(2);
        resize(&mut strict, 25);
        assert_eq!(strict.current_page(), 1);
    }

    #[test]
    fn test_duplicate_only_append_keeps_page() {
        let mut view = PagedCollectionView::new(
            PagerConfig::new()
                .with_page_size(10)
                .with_reset_policy(ResetPolicy::OnAnyChange),
        );
        resize(&mut view, 25);
        view.go_to(3);
        view.collection_changed(&CollectionChange {
            previous_len: 25,
            current_len: 25,
            kind: ChangeKind::Inserted,
        });
        assert_eq!(view.current_page(), 3);
    }

    #[test]
    fn test_page_window() {
        let mut view = view_over(200, 10);
        assert_eq!(view.page_window(7), 1..=7);
        view.go_to(10);
        assert_eq!(view.page_window(7), 7..=13);
        view.last_page();
        assert_eq!(view.page_window(7), 14..=20);

        let small = view_over(15, 10);
        assert_eq!(small.page_window(7), 1..=2);
    }

    #[test]
    fn test_summary() {
        let mut view = view_over(25, 10);
        view.last_page();
        let summary = view.summary();
        assert_eq!(summary.current_page, 3);
        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.first_item, 21);
        assert_eq!(summary.last_item, 25);
        assert_eq!(summary.total_items, 25);
    }

    #[test]
    fn test_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let mut view = view_over(25, 10);
        view.add_callback(move |event| sink.lock().unwrap().push(event.clone()));

        view.next_page();
        view.next_page();
        view.next_page();
        view.set_page_size(20);
        view.go_to(2);
        resize(&mut view, 3);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                PaginationEvent::PageChanged { old_page: 1, new_page: 2 },
                PaginationEvent::PageChanged { old_page: 2, new_page: 3 },
                PaginationEvent::PageSizeChanged {
                    old_size: 10,
                    new_size: 20,
                    total_pages: 2,
                },
                PaginationEvent::PageChanged { old_page: 1, new_page: 2 },
                PaginationEvent::Reset {
                    previous_page: 2,
                    reason: ResetReason::CollectionResized,
                },
            ]
        );
    }
}
