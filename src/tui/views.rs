//! Grid and table layouts for a page of apps.

use crate::apps::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

const CARD_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 6;
const MAX_GRID_COLUMNS: u16 = 6;
const PLACEHOLDER: &str = "-";

/// Number of card columns that fit in `width`
pub fn grid_columns(width: u16) -> u16 {
    (width / CARD_WIDTH).clamp(1, MAX_GRID_COLUMNS)
}

/// Body lines of an app card; the name goes in the card title
pub fn card_lines(app: &App) -> Vec<Line<'static>> {
    let muted = Style::default().fg(Color::DarkGray);

    let mut meta = vec![Span::styled(
        app.mode.label().to_string(),
        Style::default().fg(Color::Cyan),
    )];
    if let Some(status) = app.app_status {
        meta.push(Span::styled(" · ", muted));
        meta.push(Span::raw(status.label().to_string()));
    }
    if let Some(module) = app.module {
        meta.push(Span::styled(" · ", muted));
        meta.push(Span::raw(module.label().to_string()));
    }

    let description = app
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let mut lines = vec![Line::from(meta), Line::from(Span::styled(description, muted))];
    if !app.tags.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("# {}", app.tag_names()),
            Style::default().fg(Color::Blue),
        )));
    }
    lines
}

/// Cells of one table row, in column order
pub fn row_cells(app: &App) -> [String; 6] {
    let or_placeholder = |value: Option<String>| {
        value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };

    [
        app.name.clone(),
        or_placeholder(app.app_status.map(|s| s.label().to_string())),
        or_placeholder(app.module.map(|m| m.label().to_string())),
        or_placeholder(Some(app.tag_names())),
        or_placeholder(app.author_name.clone()),
        or_placeholder(app.description.clone()),
    ]
}

/// Selection and scroll position of the card grid
#[derive(Debug, Clone, Default)]
pub struct GridState {
    /// Index of the highlighted app within the page
    pub selected: usize,
    /// First card row on screen
    offset: usize,
    /// Columns used by the last render
    columns: usize,
}

impl GridState {
    /// Cards per row as last rendered, at least one
    pub fn columns(&self) -> usize {
        self.columns.max(1)
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Scroll just far enough to keep the selected row among `visible_rows`
    fn scroll_to_selected(&mut self, len: usize, visible_rows: usize) {
        let selected_row = self.selected.min(len.saturating_sub(1)) / self.columns();
        if selected_row < self.offset {
            self.offset = selected_row;
        } else if selected_row >= self.offset + visible_rows {
            self.offset = selected_row + 1 - visible_rows;
        }
    }
}

pub fn render_table(frame: &mut Frame, area: Rect, apps: &[App], state: &mut TableState) {
    let header = Row::new(["Title", "Status", "Module", "Tags", "Creator", "Description"])
        .style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows = apps
        .iter()
        .map(|app| Row::new(row_cells(app).map(Cell::from)));

    let widths = [
        Constraint::Length(28),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ")
        .block(Block::default().borders(Borders::TOP));

    frame.render_stateful_widget(table, area, state);
}

pub fn render_grid(frame: &mut Frame, area: Rect, apps: &[App], state: &mut GridState) {
    let columns = grid_columns(area.width);
    state.columns = usize::from(columns);
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    state.scroll_to_selected(apps.len(), visible_rows);

    let constraints: Vec<Constraint> = (0..columns)
        .map(|_| Constraint::Ratio(1, u32::from(columns)))
        .collect();

    let rows = apps
        .chunks(state.columns)
        .enumerate()
        .skip(state.offset)
        .take(visible_rows);

    for (screen_row, (row_index, row)) in rows.enumerate() {
        let y = area.y + screen_row as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > area.bottom() {
            break;
        }

        let row_area = Rect::new(area.x, y, area.width, CARD_HEIGHT);
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints.clone())
            .split(row_area);

        for (column, (app, cell)) in row.iter().zip(cells.iter()).enumerate() {
            let selected = row_index * state.columns + column == state.selected;
            let border_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let card = Paragraph::new(card_lines(app))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border_style)
                        .title(Span::styled(
                            app.name.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                );
            frame.render_widget(card, *cell);
        }
    }
}

pub fn render_empty(frame: &mut Frame, area: Rect) {
    let empty = Paragraph::new("No apps found")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(empty, area);
}
