use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::browse::BrowseCommand;
use super::list::ListCommand;
use crate::config::Config;

/// appdeck - browse, filter and page through your apps from the terminal
#[derive(Parser)]
#[command(
    name = "appdeck",
    version,
    about = "Browse, filter and page through your apps from the terminal",
    long_about = r#"appdeck loads an app catalogue and shows it a page at a time.

Examples:
  appdeck --file apps.json                               # Open the interactive browser
  appdeck --file apps.json list --page 2 --page-size 10  # Print the second page
  appdeck list --query 'tagIDs=t1;t2&keywords=coach'     # Filter like the web console URL"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Configuration file (defaults to ./.appdeck.json, ./appdeck.json, then the user config)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// JSON file with the app catalogue (overrides the configured data_file)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of apps
    List(ListCommand),

    /// Browse apps interactively (default)
    Browse(BrowseCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = Config::init(self.config.as_deref()).await?;
        if let Some(file) = self.file {
            config.data_file = Some(file);
        }
        config.validate()?;
        debug!("Configuration initialized");

        match self.command {
            Some(Commands::List(list_cmd)) => list_cmd.execute(&config).await,
            Some(Commands::Browse(browse_cmd)) => browse_cmd.execute(&config).await,
            None => BrowseCommand::default().execute(&config).await,
        }
    }
}

/// The data file every command needs
pub(super) fn data_file(config: &Config) -> Result<&Path> {
    config.data_file.as_deref().ok_or_else(|| {
        anyhow!("No data file configured. Use --file or set APPDECK_DATA_FILE.")
    })
}
