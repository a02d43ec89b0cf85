//! Where app records come from.

use super::{App, AppListParams};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid app data in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// One page of apps as returned by a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppListPage {
    pub data: Vec<App>,
    pub page: u32,
    pub limit: u32,
    /// Number of apps matching the request across all pages
    pub total: usize,
    pub has_more: bool,
}

impl AppListPage {
    /// Cut page `params.page` out of the apps matching `params`
    pub fn paginate(
        apps: &[App],
        params: &AppListParams,
        current_user: Option<&str>,
    ) -> SourceResult<Self> {
        if params.page == 0 {
            return Err(SourceError::InvalidRequest("page numbers start at 1".to_string()));
        }
        if params.limit == 0 {
            return Err(SourceError::InvalidRequest("limit must be positive".to_string()));
        }

        let matching: Vec<&App> = apps
            .iter()
            .filter(|app| params.matches(app, current_user))
            .collect();

        let limit = params.limit as usize;
        let start = (params.page as usize - 1).saturating_mul(limit);
        let data: Vec<App> = matching
            .iter()
            .skip(start)
            .take(limit)
            .map(|app| (*app).clone())
            .collect();

        Ok(Self {
            has_more: start.saturating_add(limit) < matching.len(),
            total: matching.len(),
            data,
            page: params.page,
            limit: params.limit,
        })
    }
}

/// Read-only access to the app catalogue
#[async_trait]
pub trait AppSource: Send + Sync {
    /// Fetch one page of apps matching `params`
    async fn fetch_page(&self, params: &AppListParams) -> SourceResult<AppListPage>;
}

/// Accepted layouts of an apps file
#[derive(Deserialize)]
#[serde(untagged)]
enum AppsFile {
    List(Vec<App>),
    Wrapped { data: Vec<App> },
}

/// Apps stored in a JSON file, re-read on every fetch
#[derive(Debug, Clone)]
pub struct FileAppSource {
    path: PathBuf,
    current_user: Option<String>,
}

impl FileAppSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current_user: None,
        }
    }

    /// Identify the user that "created by me" refers to
    pub fn with_current_user(mut self, user: Option<String>) -> Self {
        self.current_user = user;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> SourceResult<Vec<App>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        let file: AppsFile = serde_json::from_str(&content).map_err(|source| SourceError::Json {
            path: self.path.clone(),
            source,
        })?;

        Ok(match file {
            AppsFile::List(apps) | AppsFile::Wrapped { data: apps } => apps,
        })
    }
}

#[async_trait]
impl AppSource for FileAppSource {
    async fn fetch_page(&self, params: &AppListParams) -> SourceResult<AppListPage> {
        let apps = self.load().await?;
        let page = AppListPage::paginate(&apps, params, self.current_user.as_deref())?;
        debug!(
            path = %self.path.display(),
            page = page.page,
            returned = page.data.len(),
            total = page.total,
            "Fetched app page"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::fixtures::apps;
    use crate::apps::AppMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(value: &serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn params(page: u32, limit: u32) -> AppListParams {
        AppListParams {
            page,
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn test_paginate() {
        let all = apps(25);
        let first = AppListPage::paginate(&all, &params(1, 10), None).unwrap();
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.total, 25);
        assert!(first.has_more);

        let last = AppListPage::paginate(&all, &params(3, 10), None).unwrap();
        assert_eq!(last.data.len(), 5);
        assert_eq!(last.data[0].id, "app-20");
        assert!(!last.has_more);

        let past = AppListPage::paginate(&all, &params(9, 10), None).unwrap();
        assert!(past.data.is_empty());
        assert!(!past.has_more);
    }

    #[test]
    fn test_paginate_exact_multiple() {
        let all = apps(20);
        let second = AppListPage::paginate(&all, &params(2, 10), None).unwrap();
        assert_eq!(second.data.len(), 10);
        assert!(!second.has_more);
    }

    #[test]
    fn test_invalid_requests() {
        let all = apps(3);
        assert!(matches!(
            AppListPage::paginate(&all, &params(0, 10), None),
            Err(SourceError::InvalidRequest(_))
        ));
        assert!(matches!(
            AppListPage::paginate(&all, &params(1, 0), None),
            Err(SourceError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_reads_array_and_wrapped_layouts() {
        let list = write_json(&serde_json::to_value(apps(12)).unwrap());
        let wrapped = write_json(&serde_json::json!({ "data": apps(12) }));

        for file in [&list, &wrapped] {
            let source = FileAppSource::new(file.path());
            let page = source.fetch_page(&params(2, 5)).await.unwrap();
            assert_eq!(page.total, 12);
            assert_eq!(page.data[0].id, "app-5");
            assert!(page.has_more);
        }
    }

    #[tokio::test]
    async fn test_file_source_filters() {
        let mut all = apps(4);
        all[1].mode = AppMode::Chat;
        all[3].mode = AppMode::Chat;
        all[3].created_by = Some("me".into());
        let file = write_json(&serde_json::to_value(&all).unwrap());

        let source = FileAppSource::new(file.path()).with_current_user(Some("me".into()));
        let chats = AppListParams {
            mode: Some(AppMode::Chat),
            ..params(1, 10)
        };
        let page = source.fetch_page(&chats).await.unwrap();
        assert_eq!(page.total, 2);

        let mine = AppListParams {
            is_created_by_me: true,
            ..chats
        };
        let page = source.fetch_page(&mine).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "app-3");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = FileAppSource::new("/definitely/not/here/apps.json");
        let err = source.fetch_page(&params(1, 10)).await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here/apps.json"));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let file = write_json(&serde_json::json!({ "apps": 3 }));
        let err = FileAppSource::new(file.path())
            .fetch_page(&params(1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
    }
}
