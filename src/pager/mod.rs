//! Client-side paging over an in-memory collection.
//!
//! A [`PagedCollectionView`] decides which contiguous slice of a collection is
//! visible and offers clamped navigation over it. The view never owns the
//! items: a [`Collection`] (or a [`PagedList`], which bundles both) reports
//! every mutation as a [`CollectionChange`] and the view recomputes its page
//! from that.

pub mod collection;
pub mod view;

pub use collection::*;
pub use view::*;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A record that can be paged. Only its identity matters here.
pub trait Item: Debug + Clone + Send + Sync {
    /// Stable unique identifier
    fn id(&self) -> &str;
}

/// Page sizes a view accepts unless configured otherwise
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Page size used when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// When a collection change sends the view back to the first page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Reset only when the number of items changed
    #[default]
    OnLengthChange,
    /// Also reset when the whole collection was replaced with one of equal length
    OnAnyChange,
}

/// How the pagination status is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStyle {
    /// "Page 1 of 10"
    Compact,
    /// "Page 1 of 10 (1-20 of 200 items)"
    #[default]
    Full,
    /// "< 1 2 [3] 4 5 >"
    Numbers,
}

/// Configuration handed to a view when it is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerConfig {
    /// Page size the view starts with
    pub default_page_size: usize,

    /// The only sizes `set_page_size` accepts
    pub page_size_options: Vec<usize>,

    /// Reaction to collection changes
    pub reset_policy: ResetPolicy,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            reset_policy: ResetPolicy::default(),
        }
    }
}

impl PagerConfig {
    /// Create a configuration with the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on a different page size
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Replace the allowed page sizes
    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Change the reset policy
    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    /// Whether `size` may be selected
    pub fn allows(&self, size: usize) -> bool {
        size > 0 && self.page_size_options.contains(&size)
    }

    /// The allowed size following `current`, wrapping around
    pub fn next_page_size(&self, current: usize) -> Option<usize> {
        let position = self.page_size_options.iter().position(|&s| s == current);
        match position {
            Some(i) => self
                .page_size_options
                .get((i + 1) % self.page_size_options.len())
                .copied(),
            None => self.page_size_options.first().copied(),
        }
    }
}

/// Why a view went back to the first page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    CollectionResized,
    CollectionReplaced,
}

/// Notifications emitted by a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationEvent {
    /// Current page changed through navigation
    PageChanged { old_page: usize, new_page: usize },

    /// Page size changed; the view is back on page 1
    PageSizeChanged {
        old_size: usize,
        new_size: usize,
        total_pages: usize,
    },

    /// The collection changed underneath the view
    Reset {
        previous_page: usize,
        reason: ResetReason,
    },
}
