//! Category picker overlay.
//!
//! Single-select list of "All" plus every category in the collection. The
//! current selector value is marked with a bullet.

use crate::app::App;
use crate::util::strip_control_chars;
use ratatui::{
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use super::helpers::centered_rect;

pub(super) fn render(f: &mut Frame, app: &App) {
    let Some(picker) = app.picker else {
        return;
    };

    let overlay = centered_rect(40, 60, f.area());
    if overlay.width < 16 || overlay.height < 4 {
        return;
    }
    f.render_widget(Clear, overlay);

    let current = app.movies.selection().category();
    let items: Vec<ListItem> = app
        .picker_options()
        .iter()
        .map(|choice| {
            let bullet = if choice == current { "• " } else { "  " };
            ListItem::new(format!("{}{}", bullet, strip_control_chars(choice.label())))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Pick a category "),
        )
        .style(app.style("overlay_body"))
        .highlight_style(app.style("movie_selected"));

    let mut state = ListState::default().with_selected(Some(picker.selected));
    f.render_stateful_widget(list, overlay, &mut state);
}
