use anyhow::{Context, Result};
use clap::Args;

use crate::apps::{AppMode, AppModule, AppStatus, AppsQuery};

/// Filters shared by the list and browse commands
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Query string as used in the web console URL, e.g. 'tagIDs=a;b&keywords=bot'
    #[arg(long)]
    pub query: Option<String>,

    /// App type tab: all, workflow, advanced-chat, chat, agent-chat, completion
    #[arg(long, default_value = "all")]
    pub tab: String,

    /// Only apps whose name contains this text
    #[arg(short = 'k', long)]
    pub keywords: Option<String>,

    /// Only apps carrying this tag id (repeatable)
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Only apps created by the configured user
    #[arg(long)]
    pub mine: bool,

    /// Only apps in this module (global, college, major, skill, career, region)
    #[arg(long)]
    pub module: Option<String>,

    /// Only apps with this status (testing, inProgress, completed)
    #[arg(long)]
    pub status: Option<String>,
}

impl Default for FilterArgs {
    fn default() -> Self {
        Self {
            query: None,
            tab: "all".to_string(),
            keywords: None,
            tags: Vec::new(),
            mine: false,
            module: None,
            status: None,
        }
    }
}

impl FilterArgs {
    /// Combine `--query` with the individual flags; flags win
    pub fn to_query(&self) -> Result<AppsQuery> {
        let mut query = AppsQuery::parse(self.query.as_deref().unwrap_or_default());

        if self.keywords.is_some() {
            query.keywords = self.keywords.clone().filter(|k| !k.is_empty());
        }
        if !self.tags.is_empty() {
            query.tag_ids = self.tags.clone();
        }
        if self.mine {
            query.is_created_by_me = true;
        }
        if let Some(module) = &self.module {
            query.module = Some(module.clone());
        }
        if let Some(status) = &self.status {
            query.app_status = Some(status.clone());
        }

        if let Some(module) = &query.module {
            module.parse::<AppModule>().context("Invalid module filter")?;
        }
        if let Some(status) = &query.app_status {
            status.parse::<AppStatus>().context("Invalid status filter")?;
        }

        Ok(query)
    }

    /// The selected tab, checked against the known app types
    pub fn tab(&self) -> Result<String> {
        if self.tab != "all" {
            self.tab.parse::<AppMode>().context("Invalid tab")?;
        }
        Ok(self.tab.clone())
    }
}
