//! Terminal user interface for browsing the app list, built on ratatui

mod browser;
mod events;
mod pagination_bar;
mod views;

use browser::Browser;
use events::EventHandler;

use crate::apps::{AppListParams, AppSource, AppsQuery, FileAppSource, InfiniteAppList};
use crate::config::Config;
use anyhow::Result;
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

pub type Backend = CrosstermBackend<io::Stdout>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Leave raw mode and the alternate screen without a `Terminal` at hand.
///
/// Safe to call when the terminal was never set up, which is what the panic
/// hook relies on.
pub fn reset_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    reset_terminal()?;
    terminal.show_cursor()?;
    Ok(())
}

/// Browse the apps in `data_file` until the user quits
pub async fn run(config: &Config, data_file: &Path, query: AppsQuery, tab: String) -> Result<()> {
    let source = FileAppSource::new(data_file).with_current_user(config.current_user.clone());
    debug!(path = %source.path().display(), "Browsing apps");
    let params = AppListParams::from_query(&query, &tab, config.fetch_limit);
    let mut browser = Browser::new(config, InfiniteAppList::new(source, params), query, tab);
    browser.refresh().await;

    let mut terminal = init_terminal()?;
    let mut event_handler = EventHandler::new();

    let result = run_app(&mut terminal, &mut browser, &mut event_handler).await;

    restore_terminal(&mut terminal)?;

    let view = browser.list().view();
    if view.page_size() != config.page_size || browser.view_mode() != config.view_mode {
        let preferences = Config {
            page_size: view.page_size(),
            view_mode: browser.view_mode(),
            ..config.clone()
        };
        match preferences.save_preferences().await {
            Ok(path) => info!("Saved list preferences to {}", path.display()),
            Err(e) => warn!("Could not save list preferences: {e:#}"),
        }
    }

    result
}

/// Main application loop
async fn run_app<S: AppSource>(
    terminal: &mut Terminal<Backend>,
    browser: &mut Browser<S>,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| browser.render(frame))?;

        let event = event_handler.next().await?;
        if browser.handle_event(event).await? {
            break; // Exit requested
        }
    }
    Ok(())
}
