//! Movie list panel: the current page window with vote counters and a
//! like/dislike ratio bar per row.

use crate::app::{App, Focus, LoadState};
use crate::board::{Movie, VoteState};
use crate::util::{fit_to_width, strip_control_chars};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const MARKER_WIDTH: usize = 2;
const CATEGORY_WIDTH: usize = 12;
const BAR_WIDTH: usize = 10;
const COUNTS_WIDTH: usize = 15;
/// Below this the ratio bar is dropped to leave room for the title.
const MIN_TITLE_WIDTH: usize = 12;

/// Split `width` cells between likes and dislikes.
///
/// Returns `None` for a movie without votes. A non-zero share always gets
/// at least one cell.
pub(super) fn ratio_bar(movie: &Movie, width: usize) -> Option<(usize, usize)> {
    let ratio = movie.like_ratio()?;
    if width == 0 {
        return Some((0, 0));
    }
    let mut likes = (ratio * width as f64).round() as usize;
    if movie.likes > 0 && likes == 0 {
        likes = 1;
    }
    if movie.dislikes > 0 && likes == width {
        likes = width - 1;
    }
    Some((likes, width - likes))
}

fn vote_marker(state: VoteState) -> &'static str {
    match state {
        VoteState::Liked => "▲ ",
        VoteState::Disliked => "▼ ",
        VoteState::Neutral => "  ",
    }
}

fn movie_line<'a>(app: &App, movie: &Movie, inner_width: usize) -> Line<'a> {
    let mut fixed = MARKER_WIDTH + 1 + CATEGORY_WIDTH + 1 + COUNTS_WIDTH;
    let mut show_bar = true;
    if inner_width < fixed + BAR_WIDTH + 1 + MIN_TITLE_WIDTH {
        show_bar = false;
    } else {
        fixed += BAR_WIDTH + 1;
    }
    let title_width = inner_width.saturating_sub(fixed).max(1);

    let title = strip_control_chars(&movie.title);
    let category = strip_control_chars(&movie.category);

    let mut spans = vec![
        Span::styled(vote_marker(app.movies.vote_state(&movie.id)), app.style("vote_marker")),
        Span::styled(fit_to_width(&title, title_width), app.style("movie_title")),
        Span::raw(" "),
        Span::styled(fit_to_width(&category, CATEGORY_WIDTH), app.style("movie_category")),
        Span::raw(" "),
    ];

    if show_bar {
        match ratio_bar(movie, BAR_WIDTH) {
            Some((likes, dislikes)) => {
                spans.push(Span::styled("█".repeat(likes), app.style("like_bar")));
                spans.push(Span::styled("█".repeat(dislikes), app.style("dislike_bar")));
            }
            None => spans.push(Span::styled(
                fit_to_width("no votes", BAR_WIDTH),
                app.style("metadata"),
            )),
        }
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(format!("{:>6}", movie.likes), app.style("like_count")));
    spans.push(Span::styled(" ▲ ", app.style("metadata")));
    spans.push(Span::styled(format!("{:<5}", movie.dislikes), app.style("dislike_count")));
    spans.push(Span::styled("▼", app.style("metadata")));

    Line::from(spans)
}

/// Message shown in place of the list when the page window is empty.
fn empty_message(app: &App) -> (String, &'static str) {
    if !app.movies.movies().is_empty() {
        return ("No movies on this page".to_string(), "metadata");
    }
    match &app.load_state {
        LoadState::Loading(_) => (
            format!("Loading movies from {}...", app.catalog.describe()),
            "metadata",
        ),
        LoadState::Failed(e) => (
            format!("Failed to load movies: {}\n\nPress R to retry.", e),
            "error",
        ),
        LoadState::Ready => ("No movies. Press R to reset.".to_string(), "metadata"),
    }
}

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let board = &app.movies;
    let focused = app.focus == Focus::Movies && app.picker.is_none();
    let border_style = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let title = if board.pagination_visible() {
        format!(
            " Movies (page {}/{}) ",
            board.selection().current_page(),
            board.page_count().max(1)
        )
    } else {
        " Movies ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let window = board.window();
    if window.is_empty() {
        let (text, role) = empty_message(app);
        let paragraph = Paragraph::new(text)
            .style(app.style(role))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = window
        .iter()
        .map(|movie| ListItem::new(movie_line(app, movie, inner_width)))
        .collect();

    let mut state = ListState::default().with_selected(Some(app.selected_movie));
    let highlight = if focused {
        app.style("movie_selected")
    } else {
        app.style("movie_normal")
    };
    let list = List::new(items)
        .block(block)
        .style(app.style("movie_normal"))
        .highlight_style(highlight);

    f.render_stateful_widget(list, area, &mut state);
}
