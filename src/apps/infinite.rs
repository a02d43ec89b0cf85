//! Page-by-page loading of the app list.
//!
//! The loader keeps every page fetched so far and only asks for the next one
//! when the end of the loaded list is in view, more pages exist, and the last
//! attempt did not fail.

use super::{App, AppListPage, AppListParams, AppSource, SourceError};
use tracing::debug;

#[derive(Debug)]
pub struct InfiniteAppList<S: AppSource> {
    source: S,
    params: AppListParams,
    pages: Vec<AppListPage>,
    /// Message of the last failed fetch; blocks automatic fetching until a refetch
    error: Option<String>,
}

impl<S: AppSource> InfiniteAppList<S> {
    pub fn new(source: S, params: AppListParams) -> Self {
        Self {
            source,
            params,
            pages: Vec::new(),
            error: None,
        }
    }

    pub fn params(&self) -> &AppListParams {
        &self.params
    }

    /// Switch to new filters; fetched pages belong to the old ones and are dropped
    pub fn set_params(&mut self, params: AppListParams) {
        self.params = params;
        self.pages.clear();
        self.error = None;
    }

    pub fn pages(&self) -> &[AppListPage] {
        &self.pages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Unknown before the first fetch, so assume there is one
    pub fn has_next_page(&self) -> bool {
        self.pages.last().map_or(true, |page| page.has_more)
    }

    /// Whether the anchor at the end of the list should trigger a fetch
    pub fn should_fetch_next(&self, anchor_visible: bool) -> bool {
        anchor_visible && self.error.is_none() && self.has_next_page()
    }

    /// Every app fetched so far, in page order
    pub fn apps(&self) -> Vec<App> {
        self.pages
            .iter()
            .flat_map(|page| page.data.iter().cloned())
            .collect()
    }

    /// Whether the first page reported any matching app at all
    pub fn has_any_app(&self) -> bool {
        self.pages.first().map_or(0, |page| page.total) > 0
    }

    /// Drop everything and load page 1
    pub async fn fetch_first_page(&mut self) -> Result<(), SourceError> {
        self.pages.clear();
        self.error = None;
        self.fetch_next_page().await.map(|_| ())
    }

    /// Load page 1 again, clearing a recorded error
    pub async fn refetch(&mut self) -> Result<(), SourceError> {
        debug!(params = ?self.params, "Refetching apps");
        self.fetch_first_page().await
    }

    /// Load the page after the last one fetched. Returns `false` when there is none.
    pub async fn fetch_next_page(&mut self) -> Result<bool, SourceError> {
        if !self.has_next_page() {
            return Ok(false);
        }

        let next = self.pages.last().map_or(1, |page| page.page + 1);
        let params = self.params.with_page(next);

        let result = self.source.fetch_page(&params).await;
        match result {
            Ok(page) => {
                debug!(page = page.page, has_more = page.has_more, "Loaded app page");
                self.error = None;
                self.pages.push(page);
                Ok(true)
            }
            Err(err) => {
                debug!(page = next, error = %err, "Failed to load app page");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Keep fetching while the anchor would stay in view
    pub async fn load_all(&mut self) -> Result<(), SourceError> {
        while self.should_fetch_next(true) {
            self.fetch_next_page().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::fixtures::apps;
    use crate::apps::source::SourceResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves `apps` from memory and fails on the page listed in `fail_on`
    struct MemorySource {
        apps: Vec<App>,
        fail_on: Option<u32>,
        calls: Arc<AtomicUsize>,
    }

    impl MemorySource {
        fn new(count: usize) -> Self {
            Self {
                apps: apps(count),
                fail_on: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl AppSource for MemorySource {
        async fn fetch_page(&self, params: &AppListParams) -> SourceResult<AppListPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(params.page) {
                return Err(SourceError::InvalidRequest("backend unavailable".to_string()));
            }
            AppListPage::paginate(&self.apps, params, None)
        }
    }

    fn params(limit: u32) -> AppListParams {
        AppListParams {
            limit,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_before_first_fetch() {
        let list = InfiniteAppList::new(MemorySource::new(3), params(10));
        assert!(list.has_next_page());
        assert!(list.should_fetch_next(true));
        assert!(!list.should_fetch_next(false));
        assert!(!list.has_any_app());
        assert!(list.apps().is_empty());
    }

    #[tokio::test]
    async fn test_fetches_pages_in_order() {
        let mut list = InfiniteAppList::new(MemorySource::new(25), params(10));
        assert!(list.fetch_next_page().await.unwrap());
        assert!(list.fetch_next_page().await.unwrap());
        assert_eq!(list.apps().len(), 20);
        assert!(list.has_next_page());

        assert!(list.fetch_next_page().await.unwrap());
        assert!(!list.has_next_page());
        assert!(!list.fetch_next_page().await.unwrap());

        let ids: Vec<String> = list.apps().into_iter().map(|app| app.id).collect();
        assert_eq!(ids.first().map(String::as_str), Some("app-0"));
        assert_eq!(ids.last().map(String::as_str), Some("app-24"));
        assert!(list.has_any_app());
    }

    #[tokio::test]
    async fn test_load_all() {
        let source = MemorySource::new(61);
        let calls = Arc::clone(&source.calls);
        let mut list = InfiniteAppList::new(source, params(30));
        list.load_all().await.unwrap();
        assert_eq!(list.apps().len(), 61);
        assert_eq!(list.pages().len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_result() {
        let mut list = InfiniteAppList::new(MemorySource::new(0), params(30));
        list.load_all().await.unwrap();
        assert_eq!(list.pages().len(), 1);
        assert!(!list.has_any_app());
        assert!(!list.should_fetch_next(true));
    }

    #[tokio::test]
    async fn test_error_blocks_automatic_fetching_until_refetch() {
        let mut source = MemorySource::new(25);
        source.fail_on = Some(2);
        let mut list = InfiniteAppList::new(source, params(10));

        assert!(list.load_all().await.is_err());
        assert_eq!(list.pages().len(), 1);
        assert_eq!(list.error(), Some("Invalid request: backend unavailable"));
        assert!(!list.should_fetch_next(true));

        list.refetch().await.unwrap();
        assert!(list.error().is_none());
        assert_eq!(list.pages().len(), 1);
        assert!(list.should_fetch_next(true));
    }

    #[tokio::test]
    async fn test_fetch_first_page_starts_over() {
        let mut list = InfiniteAppList::new(MemorySource::new(25), params(10));
        list.load_all().await.unwrap();
        assert_eq!(list.pages().len(), 3);

        list.fetch_first_page().await.unwrap();
        assert_eq!(list.pages().len(), 1);
        assert_eq!(list.apps().len(), 10);
        assert!(list.has_next_page());
    }

    #[tokio::test]
    async fn test_set_params_drops_pages() {
        let mut list = InfiniteAppList::new(MemorySource::new(25), params(10));
        list.load_all().await.unwrap();

        list.set_params(AppListParams {
            name: "App 2".into(),
            ..params(10)
        });
        assert!(list.pages().is_empty());

        list.load_all().await.unwrap();
        // "App 2" and "App 20".."App 24"
        assert_eq!(list.apps().len(), 6);
    }
}
