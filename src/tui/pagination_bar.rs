//! Pagination status line shown under the app list.

use crate::pager::{PagedCollectionView, PaginationStyle};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Maximum number of page numbers in the `Numbers` style
const MAX_PAGE_NUMBERS: usize = 7;

/// Styling configuration for pagination
#[derive(Debug, Clone)]
pub struct PaginationStyling {
    /// Style for current page
    pub current_page_style: Style,

    /// Style for other pages
    pub page_style: Style,

    /// Style for navigation arrows
    pub navigation_style: Style,

    /// Style for disabled elements
    pub disabled_style: Style,

    /// Style for text elements
    pub text_style: Style,

    /// Style for input elements
    pub input_style: Style,
}

impl Default for PaginationStyling {
    fn default() -> Self {
        Self {
            current_page_style: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            page_style: Style::default().fg(Color::Blue),
            navigation_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            disabled_style: Style::default().fg(Color::DarkGray),
            text_style: Style::default().fg(Color::White),
            input_style: Style::default().bg(Color::DarkGray).fg(Color::White),
        }
    }
}

/// Render the pagination status, plus an input prompt as `(label, input)` while one is open
pub fn pagination_lines(
    view: &PagedCollectionView,
    style: PaginationStyle,
    styling: &PaginationStyling,
    prompt: Option<(&str, &str)>,
) -> Vec<Line<'static>> {
    let mut lines = vec![match style {
        PaginationStyle::Compact => compact_line(view, styling),
        PaginationStyle::Full => full_line(view, styling),
        PaginationStyle::Numbers => numbers_line(view, styling),
    }];

    if let Some((label, input)) = prompt {
        lines.push(Line::from(vec![
            Span::styled(format!("{label}: "), styling.text_style),
            Span::styled(input.to_string(), styling.input_style),
            Span::styled("_", styling.input_style),
        ]));
    }

    lines
}

fn compact_line(view: &PagedCollectionView, styling: &PaginationStyling) -> Line<'static> {
    Line::from(vec![Span::styled(
        format!("Page {} of {}", view.current_page(), view.total_pages()),
        styling.text_style,
    )])
}

fn full_line(view: &PagedCollectionView, styling: &PaginationStyling) -> Line<'static> {
    let summary = view.summary();
    let items = if summary.total_items == 0 {
        " (0 items)".to_string()
    } else {
        format!(
            " ({}-{} of {} items)",
            summary.first_item, summary.last_item, summary.total_items
        )
    };

    Line::from(vec![
        Span::styled(
            format!("Page {} of {}", summary.current_page, summary.total_pages),
            styling.text_style,
        ),
        Span::styled(items, styling.text_style),
    ])
}

fn numbers_line(view: &PagedCollectionView, styling: &PaginationStyling) -> Line<'static> {
    let arrow_style = |enabled: bool| {
        if enabled {
            styling.navigation_style
        } else {
            styling.disabled_style
        }
    };

    let mut spans = vec![Span::styled("< ", arrow_style(!view.is_first_page()))];

    for page in view.page_window(MAX_PAGE_NUMBERS) {
        if page == view.current_page() {
            spans.push(Span::styled(format!("[{page}] "), styling.current_page_style));
        } else {
            spans.push(Span::styled(format!("{page} "), styling.page_style));
        }
    }

    spans.push(Span::styled(">", arrow_style(!view.is_last_page())));
    Line::from(spans)
}
