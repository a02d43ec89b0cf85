//! Interactive app list: state, key bindings and layout.

use super::events::Event;
use super::pagination_bar::{pagination_lines, PaginationStyling};
use super::views::{self, GridState};
use crate::apps::{
    App, AppListParams, AppMode, AppModule, AppSource, AppStatus, AppsQuery, InfiniteAppList,
    ViewMode,
};
use crate::config::Config;
use crate::pager::{PagedList, PaginationEvent, PaginationStyle, ResetReason};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, TableState},
    Frame,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Pages skipped by PageUp/PageDown
const JUMP_PAGES: i64 = 5;

const HELP: &str = "←/→ page  ↑/↓ select  g go to  s size  v view  / search  # tags  \
                    t type  m mine  M module  S status  c clear  r reload  q quit";

/// What a key press asks the caller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
    /// The filters changed and the list must be loaded again
    FiltersChanged,
    Refetch,
    Quit,
}

/// Text inputs that can be opened over the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    GoTo,
    Keywords,
    Tags,
}

impl PromptKind {
    fn label(self) -> &'static str {
        match self {
            PromptKind::GoTo => "Go to page",
            PromptKind::Keywords => "Search",
            PromptKind::Tags => "Tag ids (; separated)",
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            PromptKind::GoTo => c.is_ascii_digit(),
            PromptKind::Keywords | PromptKind::Tags => !c.is_control(),
        }
    }
}

#[derive(Debug)]
struct Prompt {
    kind: PromptKind,
    input: String,
}

/// The value after `current` in `all`; the last value is followed by `None`
fn cycle<T: Copy + PartialEq>(all: &[T], current: Option<T>) -> Option<T> {
    match current.and_then(|value| all.iter().position(|v| *v == value)) {
        Some(index) => all.get(index + 1).copied(),
        None => all.first().copied(),
    }
}

pub struct Browser<S: AppSource> {
    list: PagedList<App>,
    loader: InfiniteAppList<S>,
    query: AppsQuery,
    tab: String,
    view_mode: ViewMode,
    pagination_style: PaginationStyle,
    styling: PaginationStyling,
    prompt: Option<Prompt>,
    status: Option<String>,
    /// Pager events, drained after every key press and reload
    events: Arc<Mutex<Vec<PaginationEvent>>>,
    /// Highlighted app within the current page
    selected: usize,
    table_state: TableState,
    grid_state: GridState,
}

impl<S: AppSource> Browser<S> {
    pub fn new(config: &Config, loader: InfiniteAppList<S>, query: AppsQuery, tab: String) -> Self {
        let mut list = PagedList::new(config.pager_config());

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        list.view_mut().add_callback(move |event: &PaginationEvent| {
            if let Ok(mut queue) = sink.lock() {
                queue.push(event.clone());
            }
        });

        Self {
            list,
            loader,
            query,
            tab,
            view_mode: config.view_mode,
            pagination_style: config.pagination_style,
            styling: PaginationStyling::default(),
            prompt: None,
            status: None,
            events,
            selected: 0,
            table_state: TableState::default(),
            grid_state: GridState::default(),
        }
    }

    pub fn list(&self) -> &PagedList<App> {
        &self.list
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Reload every page from the source and hand the result to the list
    pub async fn refresh(&mut self) {
        // A failure is recorded by the loader and reported by `reload`
        let _ = self.loader.refetch().await;
        self.reload().await;
    }

    /// Request the apps matching the current filters
    async fn apply_filters(&mut self) {
        let limit = self.loader.params().limit;
        let params = AppListParams::from_query(&self.query, &self.tab, limit);
        debug!(query = %self.query.to_query_string(), tab = %self.tab, "Filters changed");
        self.loader.set_params(params);
        self.reload().await;
    }

    /// Fetch the remaining pages and replace the list contents
    async fn reload(&mut self) {
        let _ = self.loader.load_all().await;
        self.list.replace(self.loader.apps());
        let reset_note = self.process_pagination_events();

        let count = self.list.collection().len();
        let mut status = match self.loader.error() {
            Some(error) => {
                debug!(error, "Loading apps failed");
                format!("Failed to load apps: {error}. Press r to retry")
            }
            None if self.list.collection().is_empty() => "No apps match the filters".to_string(),
            None => {
                debug!(count, "Loaded apps");
                format!("Loaded {count} apps")
            }
        };
        if let Some(note) = reset_note {
            status.push_str(", ");
            status.push_str(&note);
        }
        self.status = Some(status);
    }

    /// Handle an event; returns `true` when the browser should exit
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match self.handle_key(key) {
                KeyOutcome::Quit => return Ok(true),
                KeyOutcome::Refetch => self.refresh().await,
                KeyOutcome::FiltersChanged => self.apply_filters().await,
                KeyOutcome::Handled | KeyOutcome::Ignored => {}
            },
            Event::Key(_) | Event::Resize | Event::Tick => {}
        }
        Ok(false)
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let outcome = if self.prompt.is_some() {
            self.handle_prompt_key(key)
        } else {
            self.handle_list_key(key)
        };

        if let Some(note) = self.process_pagination_events() {
            self.status = Some(note);
        }
        outcome
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let view = self.list.view_mut();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyOutcome::Quit,
            KeyCode::Char('q') | KeyCode::Esc => KeyOutcome::Quit,
            KeyCode::Left | KeyCode::Char('h') => {
                view.previous_page();
                KeyOutcome::Handled
            }
            KeyCode::Right | KeyCode::Char('l') => {
                view.next_page();
                KeyOutcome::Handled
            }
            KeyCode::Home => {
                view.first_page();
                KeyOutcome::Handled
            }
            KeyCode::End | KeyCode::Char('G') => {
                view.last_page();
                KeyOutcome::Handled
            }
            KeyCode::PageUp => {
                view.go_to(view.current_page() as i64 - JUMP_PAGES);
                KeyOutcome::Handled
            }
            KeyCode::PageDown => {
                view.go_to(view.current_page() as i64 + JUMP_PAGES);
                KeyOutcome::Handled
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(false);
                KeyOutcome::Handled
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(true);
                KeyOutcome::Handled
            }
            KeyCode::Char('s') => {
                if let Some(size) = view.config().next_page_size(view.page_size()) {
                    view.set_page_size(size);
                }
                KeyOutcome::Handled
            }
            KeyCode::Char('v') => {
                self.view_mode = self.view_mode.toggle();
                debug!(view_mode = %self.view_mode, "View mode toggled");
                KeyOutcome::Handled
            }
            KeyCode::Char('g') => self.open_prompt(PromptKind::GoTo, String::new()),
            KeyCode::Char('/') => {
                let keywords = self.query.keywords.clone().unwrap_or_default();
                self.open_prompt(PromptKind::Keywords, keywords)
            }
            KeyCode::Char('#') => {
                let tags = self.query.tag_ids.join(";");
                self.open_prompt(PromptKind::Tags, tags)
            }
            KeyCode::Char('t') => {
                let next = cycle(AppMode::ALL, AppMode::from_tab(&self.tab));
                self.tab = next.map_or("all", AppMode::as_str).to_string();
                KeyOutcome::FiltersChanged
            }
            KeyCode::Char('m') => {
                self.query.is_created_by_me = !self.query.is_created_by_me;
                KeyOutcome::FiltersChanged
            }
            KeyCode::Char('M') => {
                let current = self.query.module.as_deref().and_then(|m| m.parse().ok());
                self.query.module = cycle(AppModule::ALL, current).map(|m| m.as_str().to_string());
                KeyOutcome::FiltersChanged
            }
            KeyCode::Char('S') => {
                let current = self.query.app_status.as_deref().and_then(|s| s.parse().ok());
                self.query.app_status =
                    cycle(AppStatus::ALL, current).map(|s| s.as_str().to_string());
                KeyOutcome::FiltersChanged
            }
            KeyCode::Char('c') => {
                if self.query.is_empty() && self.tab == "all" {
                    return KeyOutcome::Ignored;
                }
                self.query = AppsQuery::default();
                self.tab = "all".to_string();
                KeyOutcome::FiltersChanged
            }
            KeyCode::Char('r') => KeyOutcome::Refetch,
            _ => KeyOutcome::Ignored,
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, input: String) -> KeyOutcome {
        self.prompt = Some(Prompt { kind, input });
        KeyOutcome::Handled
    }

    /// Handle keyboard input while a prompt is open
    fn handle_prompt_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let Some(prompt) = self.prompt.as_mut() else {
            return KeyOutcome::Ignored;
        };

        match key.code {
            KeyCode::Char(c) if prompt.kind.accepts(c) => {
                prompt.input.push(c);
                KeyOutcome::Handled
            }
            KeyCode::Backspace => {
                prompt.input.pop();
                KeyOutcome::Handled
            }
            KeyCode::Esc => {
                self.prompt = None;
                KeyOutcome::Handled
            }
            KeyCode::Enter => match self.prompt.take() {
                Some(prompt) => self.submit_prompt(prompt),
                None => KeyOutcome::Ignored,
            },
            _ => KeyOutcome::Ignored,
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) -> KeyOutcome {
        let input = prompt.input.trim();
        match prompt.kind {
            PromptKind::GoTo => {
                if let Ok(page) = input.parse::<i64>() {
                    let landed = self.list.view_mut().go_to(page);
                    self.status = Some(format!("Page {landed}"));
                }
                KeyOutcome::Handled
            }
            PromptKind::Keywords => {
                self.query.keywords = (!input.is_empty()).then(|| input.to_string());
                KeyOutcome::FiltersChanged
            }
            PromptKind::Tags => {
                self.query.tag_ids = input
                    .split(|c| c == ';' || c == ',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
                KeyOutcome::FiltersChanged
            }
        }
    }

    /// Move the highlight one row; a grid row spans several apps
    fn move_selection(&mut self, down: bool) {
        let step = match self.view_mode {
            ViewMode::Grid => self.grid_state.columns(),
            ViewMode::Table => 1,
        };
        let last = self.list.visible().len().saturating_sub(1);
        self.selected = if down {
            (self.selected + step).min(last)
        } else {
            self.selected.saturating_sub(step)
        };
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        self.table_state.select(None);
        *self.table_state.offset_mut() = 0;
        self.grid_state.reset();
    }

    /// Apply queued pager events; returns a note when the page was reset away from page 1
    fn process_pagination_events(&mut self) -> Option<String> {
        let events = match self.events.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => return None,
        };

        let mut note = None;
        for event in events {
            self.reset_selection();
            match event {
                PaginationEvent::PageChanged { old_page, new_page } => {
                    trace!(old_page, new_page, "Selection moved to the top of the page");
                }
                PaginationEvent::PageSizeChanged {
                    old_size,
                    new_size,
                    total_pages,
                } => {
                    self.status = Some(format!(
                        "{new_size} apps per page, {total_pages} pages (was {old_size})"
                    ));
                }
                PaginationEvent::Reset {
                    previous_page,
                    reason,
                } if previous_page > 1 => {
                    let cause = match reason {
                        ResetReason::CollectionResized => "result count changed",
                        ResetReason::CollectionReplaced => "results replaced",
                    };
                    note = Some(format!("{cause}, back to page 1 from page {previous_page}"));
                }
                PaginationEvent::Reset { .. } => {}
            }
        }
        note
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(frame.size());

        frame.render_widget(Paragraph::new(self.header_line()), chunks[0]);

        let apps = self.list.visible();
        if !self.loader.has_any_app() || apps.is_empty() {
            views::render_empty(frame, chunks[1]);
        } else {
            match self.view_mode {
                ViewMode::Grid => {
                    self.grid_state.selected = self.selected;
                    views::render_grid(frame, chunks[1], apps, &mut self.grid_state);
                }
                ViewMode::Table => {
                    self.table_state.select(Some(self.selected));
                    views::render_table(frame, chunks[1], apps, &mut self.table_state);
                }
            }
        }

        let prompt = self
            .prompt
            .as_ref()
            .map(|prompt| (prompt.kind.label(), prompt.input.as_str()));
        let pagination =
            pagination_lines(self.list.view(), self.pagination_style, &self.styling, prompt);
        frame.render_widget(Paragraph::new(pagination), chunks[2]);

        frame.render_widget(Paragraph::new(self.footer_lines()), chunks[3]);
    }

    fn header_line(&self) -> Line<'static> {
        let filters = if self.query.is_empty() {
            "no filters".to_string()
        } else {
            self.query.to_query_string()
        };

        Line::from(vec![
            Span::styled("Apps", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  [{}]", self.tab)),
            Span::styled(format!("  {filters}"), Style::default().fg(Color::DarkGray)),
            Span::raw(format!("  · {}", self.view_mode)),
        ])
    }

    fn footer_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            HELP,
            Style::default().fg(Color::DarkGray),
        ))];
        if let Some(status) = &self.status {
            lines.push(Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow),
            )));
        }
        lines
    }
}
