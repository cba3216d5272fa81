use crate::app::App;
use crate::news::Category;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the one-line category bar.
///
/// The active category is highlighted unless a search drives the results.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 1 {
        return;
    }

    let active = (!app.retrieval.is_searching()).then(|| app.category());

    let mut spans = Vec::with_capacity(Category::ALL.len() * 2);
    for (i, category) in Category::ALL.into_iter().enumerate() {
        let style = if Some(category) == active {
            app.theme.category_active
        } else {
            app.theme.category_normal
        };
        spans.push(Span::styled(
            format!(" {} {} {} ", i + 1, category.glyph(), category.name()),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
