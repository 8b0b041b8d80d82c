use crate::app::{App, Focus};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar: the latest status message, or key hints.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.is_fetching() {
        Cow::Borrowed("Loading movies...")
    } else if app.picker.is_some() {
        Cow::Borrowed("[j/k] move [Enter] select [Esc] cancel")
    } else {
        match app.focus {
            Focus::Movies => Cow::Borrowed(
                "[+/-] rate [d]elete [c]ategory [a]ll [p]age size [h/l] page [R]eset [?]help [q]uit",
            ),
            Focus::Tokens => Cow::Borrowed("[j/k] move [x] remove token [Tab] movies [?]help [q]uit"),
        }
    };

    f.render_widget(Paragraph::new(text).style(app.style("status_bar")), area);
}
