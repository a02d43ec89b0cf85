//! Observable collection ownership.
//!
//! [`Collection`] reports each mutation as a [`CollectionChange`];
//! [`PagedList`] feeds those changes into a [`PagedCollectionView`] so the
//! page is recomputed whenever the items change.

use super::{Item, PageSummary, PagedCollectionView, PagerConfig};
use std::collections::HashSet;
use tracing::trace;

/// What kind of mutation produced a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// All items were swapped for a new set
    Replaced,
    /// Items were appended
    Inserted,
}

/// A single mutation of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionChange {
    pub previous_len: usize,
    pub current_len: usize,
    pub kind: ChangeKind,
}

/// Anything that recomputes itself when a collection changes
pub trait CollectionObserver {
    fn collection_changed(&mut self, change: &CollectionChange);
}

/// Ordered items with unique ids, in insertion order
#[derive(Debug, Clone)]
pub struct Collection<T: Item> {
    items: Vec<T>,
}

impl<T: Item> Collection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swap every item for `items`
    pub fn replace(&mut self, items: Vec<T>) -> CollectionChange {
        let previous_len = self.items.len();
        self.items = items;
        self.change(previous_len, ChangeKind::Replaced)
    }

    /// Append items whose id is not present yet.
    ///
    /// Offset paging can hand out the same record twice when the source
    /// shifts between fetches; the first copy is kept. Nothing changes when
    /// every item is a duplicate.
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) -> Option<CollectionChange> {
        let previous_len = self.items.len();
        let mut seen: HashSet<String> =
            self.items.iter().map(|item| item.id().to_string()).collect();
        self.items
            .extend(items.into_iter().filter(|item| seen.insert(item.id().to_string())));

        (self.items.len() != previous_len).then(|| self.change(previous_len, ChangeKind::Inserted))
    }

    fn change(&self, previous_len: usize, kind: ChangeKind) -> CollectionChange {
        let change = CollectionChange {
            previous_len,
            current_len: self.items.len(),
            kind,
        };
        trace!(?change, "Collection changed");
        change
    }
}

impl<T: Item> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A collection together with the view paging over it.
///
/// Every mutation goes through the list so the view can never miss a change.
#[derive(Debug)]
pub struct PagedList<T: Item> {
    collection: Collection<T>,
    view: PagedCollectionView,
}

impl<T: Item> PagedList<T> {
    pub fn new(config: PagerConfig) -> Self {
        Self {
            collection: Collection::new(),
            view: PagedCollectionView::new(config),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub fn view(&self) -> &PagedCollectionView {
        &self.view
    }

    /// Navigation and page-size changes
    pub fn view_mut(&mut self) -> &mut PagedCollectionView {
        &mut self.view
    }

    /// Items on the current page
    pub fn visible(&self) -> &[T] {
        self.view.visible_slice(self.collection.items())
    }

    pub fn summary(&self) -> PageSummary {
        self.view.summary()
    }

    pub fn replace(&mut self, items: Vec<T>) {
        let change = self.collection.replace(items);
        self.view.collection_changed(&change);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        if let Some(change) = self.collection.extend(items) {
            self.view.collection_changed(&change);
        }
    }
}
