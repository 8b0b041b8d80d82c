//! Category token strip.
//!
//! Each selected category shows as a removable token. The block title carries
//! the current selector value, which is what drives the filtered count.

use crate::app::{App, Focus};
use crate::util::strip_control_chars;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let selection = app.movies.selection();
    let focused = app.focus == Focus::Tokens && app.picker.is_none();

    let line = if selection.tokens().is_empty() {
        Line::from(Span::styled(
            "No category filter (c to pick one)",
            app.style("metadata"),
        ))
    } else {
        let mut spans = Vec::with_capacity(selection.tokens().len() * 2);
        for (i, token) in selection.tokens().iter().enumerate() {
            let style = if focused && i == app.selected_token {
                app.style("token_selected")
            } else {
                app.style("token")
            };
            spans.push(Span::styled(format!(" {} × ", strip_control_chars(token)), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    };

    let border_style = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let title = format!(
        " Category: {} ({} shown) ",
        strip_control_chars(selection.category().label()),
        app.movies.filtered().len()
    );

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(paragraph, area);
}
