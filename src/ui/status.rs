use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Use Cow to avoid allocations for static strings and borrowed status messages
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.search_mode {
        Cow::Borrowed("Type to search | ESC cancel | ENTER confirm")
    } else {
        match app.view {
            View::Browse => Cow::Borrowed(
                "[j/k]move [Enter]read [/]search [Tab/1-7]category [r]efresh [w]atch ad [o]pen [q]uit",
            ),
            View::Detail => Cow::Borrowed("[b]ack [j/k]scroll [o]pen [s]hare [w]atch ad [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.theme.status_bar);
    f.render_widget(paragraph, area);
}
