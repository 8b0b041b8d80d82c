//! Pagination bar: previous, page numbers, next.
//!
//! Hidden entirely when the filtered collection is empty.

use crate::app::App;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Most page numbers shown at once.
const MAX_PAGE_LINKS: usize = 9;

/// Page numbers to display: all of them, or a window of `max` pages around
/// `current` clamped to `1..=count`.
pub(super) fn visible_pages(count: usize, current: usize, max: usize) -> std::ops::RangeInclusive<usize> {
    if count <= max || max == 0 {
        return 1..=count;
    }
    let half = max / 2;
    let start = current.saturating_sub(half).max(1).min(count - max + 1);
    start..=start + max - 1
}

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let board = &app.movies;
    if !board.pagination_visible() {
        return;
    }

    let current = board.selection().current_page();
    let count = board.page_count();
    let enabled = |on: bool| {
        if on {
            app.style("page_normal")
        } else {
            app.style("page_disabled")
        }
    };

    let pages = visible_pages(count, current, MAX_PAGE_LINKS);
    let mut spans = vec![
        Span::raw(" "),
        Span::styled("‹ Prev", enabled(board.has_previous())),
        Span::raw(" "),
    ];
    if *pages.start() > 1 {
        spans.push(Span::styled("… ", app.style("metadata")));
    }
    let last_shown = *pages.end();
    for page in pages {
        let style = if page == current {
            app.style("page_current")
        } else {
            app.style("page_normal")
        };
        spans.push(Span::styled(format!(" {} ", page), style));
    }
    if last_shown < count {
        spans.push(Span::styled(" …", app.style("metadata")));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled("Next ›", enabled(board.has_next())));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
