//! Frame layout and overlay dispatch.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{help, movies, pagination, picker, status, tokens};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Draw one frame.
///
/// Layout, top to bottom: header, category tokens, movie list, pagination
/// bar, status bar. The picker and help overlays are drawn last.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    tokens::render(f, app, chunks[1]);
    movies::render(f, app, chunks[2]);
    pagination::render(f, app, chunks[3]);
    status::render(f, app, chunks[4]);

    if app.picker.is_some() {
        picker::render(f, app);
    }

    if app.show_help {
        help::render(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let board = &app.movies;
    let meta = app.style("metadata");
    let line = Line::from(vec![
        Span::styled(" MovieBoard ", app.style("overlay_heading")),
        Span::styled(
            format!(
                " {} movies · {} liked · {} disliked · {} per page",
                board.movies().len(),
                board.votes().liked_count(),
                board.votes().disliked_count(),
                board.selection().page_size(),
            ),
            meta,
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
