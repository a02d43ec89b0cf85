use anyhow::Result;
use clap::Args;
use tracing::info;

use super::filters::FilterArgs;
use super::root::data_file;
use crate::config::Config;
use crate::tui;

/// Browse apps interactively
#[derive(Debug, Default, Args)]
pub struct BrowseCommand {
    #[command(flatten)]
    pub filters: FilterArgs,
}

impl BrowseCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let query = self.filters.to_query()?;
        let tab = self.filters.tab()?;
        let path = data_file(config)?;

        info!("Starting interactive mode");
        tui::run(config, path, query, tab).await?;
        info!("Browser closed");
        Ok(())
    }
}
