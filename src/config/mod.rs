use crate::apps::query::DEFAULT_FETCH_LIMIT;
use crate::apps::ViewMode;
use crate::pager::{
    PagerConfig, PaginationStyle, ResetPolicy, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const CONFIG_FILE_NAME: &str = "appdeck.json";

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON file holding the app catalogue
    pub data_file: Option<PathBuf>,

    /// Page size the list opens with
    pub page_size: usize,

    /// Page sizes the user can pick from
    pub page_size_options: Vec<usize>,

    /// Grid or table layout
    pub view_mode: ViewMode,

    /// When a changed result set sends the list back to page 1
    pub reset_policy: ResetPolicy,

    /// Apps requested per fetch
    pub fetch_limit: u32,

    /// Account that "created by me" refers to
    pub current_user: Option<String>,

    /// Pagination status layout
    pub pagination_style: PaginationStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            view_mode: ViewMode::default(),
            reset_policy: ResetPolicy::default(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            current_user: None,
            pagination_style: PaginationStyle::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("page_size_options must not be empty")]
    NoPageSizeOptions,

    #[error("page sizes must be greater than 0")]
    ZeroPageSize,

    #[error("page_size {size} is not one of the page_size_options {options:?}")]
    PageSizeNotAllowed { size: usize, options: Vec<usize> },

    #[error("fetch_limit must be greater than 0")]
    ZeroFetchLimit,
}

impl Config {
    /// Initialize configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise the first of `./.appdeck.json`,
    /// `./appdeck.json` and the user config file is used, if any. Environment
    /// variables override file values.
    pub async fn init(path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match path {
            Some(path) => Self::load_from_file(path).await?,
            None => match Self::candidate_paths().into_iter().find(|p| p.exists()) {
                Some(found) => Self::load_from_file(&found).await?,
                None => Self::default(),
            },
        };

        config.load_from_env();
        Ok(config)
    }

    /// Files searched when no config path is given, in priority order
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.appdeck.json"),
            PathBuf::from(format!("./{CONFIG_FILE_NAME}")),
        ];
        paths.extend(Self::user_config_path());
        paths
    }

    /// `<config dir>/appdeck/appdeck.json`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("appdeck").join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a JSON file; missing keys keep their defaults
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Apply `APPDECK_*` overrides read through `var`
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = var("APPDECK_DATA_FILE") {
            self.data_file = Some(PathBuf::from(file));
        }

        if let Some(size) = var("APPDECK_PAGE_SIZE") {
            match size.parse() {
                Ok(size) => self.page_size = size,
                Err(_) => warn!("Ignoring APPDECK_PAGE_SIZE={size}: not a number"),
            }
        }

        if let Some(mode) = var("APPDECK_VIEW_MODE") {
            match mode.parse() {
                Ok(mode) => self.view_mode = mode,
                Err(e) => warn!("Ignoring APPDECK_VIEW_MODE: {e}"),
            }
        }

        if let Some(user) = var("APPDECK_USER") {
            self.current_user = Some(user);
        }

        if let Some(limit) = var("APPDECK_FETCH_LIMIT") {
            match limit.parse() {
                Ok(limit) => self.fetch_limit = limit,
                Err(_) => warn!("Ignoring APPDECK_FETCH_LIMIT={limit}: not a number"),
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size_options.is_empty() {
            return Err(ConfigError::NoPageSizeOptions);
        }

        if self.page_size == 0 || self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }

        if !self.page_size_options.contains(&self.page_size) {
            return Err(ConfigError::PageSizeNotAllowed {
                size: self.page_size,
                options: self.page_size_options.clone(),
            });
        }

        if self.fetch_limit == 0 {
            return Err(ConfigError::ZeroFetchLimit);
        }

        Ok(())
    }

    /// Paging preferences for a new list view
    pub fn pager_config(&self) -> PagerConfig {
        PagerConfig::new()
            .with_page_size(self.page_size)
            .with_page_size_options(self.page_size_options.clone())
            .with_reset_policy(self.reset_policy)
    }

    /// Persist page size and view mode to the user config file
    pub async fn save_preferences(&self) -> Result<PathBuf> {
        let path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("No user config directory available"))?;
        self.save_preferences_to(&path).await?;
        Ok(path)
    }

    /// Write page size and view mode into `path`, keeping its other keys
    pub async fn save_preferences_to(&self, path: &Path) -> Result<()> {
        let mut document = if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        } else {
            serde_json::Map::new()
        };

        document.insert("page_size".to_string(), self.page_size.into());
        document.insert(
            "view_mode".to_string(),
            serde_json::to_value(self.view_mode)?,
        );

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serde_json::to_string_pretty(&document)?).await?;
        debug!("Saved preferences to {}", path.display());
        Ok(())
    }
}
