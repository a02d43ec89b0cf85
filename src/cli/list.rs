use anyhow::{anyhow, Result};
use clap::Args;
use serde_json::json;
use tracing::debug;

use super::filters::FilterArgs;
use super::root::data_file;
use crate::apps::{App, AppListParams, FileAppSource, InfiniteAppList};
use crate::config::Config;
use crate::pager::{PageSummary, PagedList};

/// Print one page of apps
#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Page to print; out-of-range pages are clamped
    #[arg(short = 'p', long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    /// Apps per page; must be one of the configured page sizes
    #[arg(short = 's', long)]
    pub page_size: Option<usize>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let query = self.filters.to_query()?;
        let tab = self.filters.tab()?;
        let path = data_file(config)?;

        let source = FileAppSource::new(path).with_current_user(config.current_user.clone());
        let mut loader = InfiniteAppList::new(
            source,
            AppListParams::from_query(&query, &tab, config.fetch_limit),
        );
        loader.load_all().await?;

        let mut list = PagedList::new(config.pager_config());
        for page in loader.pages() {
            list.extend(page.data.iter().cloned());
        }

        if let Some(size) = self.page_size {
            if !list.view_mut().set_page_size(size) {
                return Err(anyhow!(
                    "Page size {} is not one of {:?}",
                    size,
                    config.page_size_options
                ));
            }
        }
        let landed = list.view_mut().go_to(self.page);
        debug!(requested = self.page, landed, "Selected page");

        let summary = list.summary();
        if self.json {
            let output = json!({
                "query": query.to_query_string(),
                "tab": tab,
                "summary": summary,
                "apps": list.visible(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for app in list.visible() {
                println!("{}", format_row(app));
            }
            println!("{}", format_summary(&summary));
        }

        Ok(())
    }
}

/// One text line per app: id, name, type, status, module and tags
pub fn format_row(app: &App) -> String {
    let status = app.app_status.map_or("-", |s| s.label());
    let module = app.module.map_or("-", |m| m.label());
    let tags = app.tag_names();
    format!(
        "{:<14} {:<28} {:<11} {:<12} {:<8} {}",
        app.id,
        truncate(&app.name, 28),
        app.mode.label(),
        status,
        module,
        if tags.is_empty() { "-" } else { tags.as_str() }
    )
    .trim_end()
    .to_string()
}

pub fn format_summary(summary: &PageSummary) -> String {
    if summary.total_items == 0 {
        return "No apps found".to_string();
    }
    format!(
        "Page {} of {} ({}-{} of {} apps)",
        summary.current_page,
        summary.total_pages,
        summary.first_item,
        summary.last_item,
        summary.total_items
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
