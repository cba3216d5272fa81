use crate::app::{display_row, inline_ad_after, App, BannerSlot, INLINE_AD_EVERY};
use crate::news::{Article, Category};
use crate::retrieval::Phase;
use crate::theme::Palette;
use crate::util::{format_short_date, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::banner::banner_lines;

/// Hint under "No articles found".
pub(super) fn empty_hint(searching: bool) -> &'static str {
    if searching {
        "Try searching with different keywords or browse by category."
    } else {
        "No articles available for this category at the moment."
    }
}

/// Three-line card for one article.
fn card(article: &Article, width: usize, palette: &Palette) -> ListItem<'static> {
    let title = strip_control_chars(&article.title);
    let meta = format!(
        "{} • {} • {}",
        strip_control_chars(&article.source.name),
        strip_control_chars(&article.author),
        format_short_date(&article.published_at)
    );
    let description = strip_control_chars(&article.description);

    ListItem::new(vec![
        Line::from(Span::styled(
            truncate_to_width(&title, width).into_owned(),
            palette.article_title,
        )),
        Line::from(Span::styled(
            truncate_to_width(&meta, width).into_owned(),
            palette.article_meta,
        )),
        Line::from(Span::styled(
            truncate_to_width(&description, width).into_owned(),
            palette.article_description,
        )),
        Line::from(""),
    ])
}

fn inline_ad(app: &App, width: usize) -> ListItem<'static> {
    let mut lines: Vec<Line<'static>> = banner_lines(app, BannerSlot::Inline)
        .into_iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            Line::from(Span::styled(
                truncate_to_width(&text, width).into_owned(),
                app.theme.ad_placeholder,
            ))
        })
        .collect();
    lines.push(Line::from(""));
    ListItem::new(lines)
}

/// Render the heading, summary and the article list or its state panel.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 3 || area.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(app.retrieval.heading(), app.theme.heading)),
        Line::from(Span::styled(app.retrieval.summary(), app.theme.summary)),
    ]);
    f.render_widget(heading, chunks[0]);

    let body = chunks[1];
    match app.retrieval.phase() {
        Phase::Loading | Phase::Idle => {
            let spinner = super::SPINNER[app.spinner_frame % super::SPINNER.len()];
            render_centered(
                f,
                body,
                vec![Line::from(Span::styled(
                    format!("{} Fetching the latest news...", spinner),
                    app.theme.loading,
                ))],
                app,
            );
        }
        Phase::Error => {
            let message = app.retrieval.state().error.clone().unwrap_or_default();
            render_centered(
                f,
                body,
                vec![
                    Line::from(Span::styled("Error loading news", app.theme.error)),
                    Line::from(""),
                    Line::from(message),
                    Line::from(""),
                    Line::from(Span::styled("[r] Try Again", app.theme.button)),
                ],
                app,
            );
        }
        Phase::Success if app.articles().is_empty() => {
            render_centered(
                f,
                body,
                vec![
                    Line::from(Span::styled("No articles found", app.theme.heading)),
                    Line::from(""),
                    Line::from(Span::styled(
                        empty_hint(app.retrieval.is_searching()),
                        app.theme.empty,
                    )),
                ],
                app,
            );
        }
        Phase::Success => render_list(f, app, body),
    }
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let articles = app.articles();

    let mut items: Vec<ListItem> = Vec::with_capacity(articles.len() + articles.len() / INLINE_AD_EVERY);
    for (i, article) in articles.iter().enumerate() {
        items.push(card(article, width, &app.theme));
        if inline_ad_after(i) {
            items.push(inline_ad(app, width));
        }
    }

    let title = match app.category() {
        _ if app.retrieval.is_searching() => " Search ".to_string(),
        Category::General => " Top Headlines ".to_string(),
        category => format!(" {} ", category.name()),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_focused)
                .title(title),
        )
        .highlight_style(app.theme.article_selected)
        .highlight_symbol("▌");

    let mut state = ListState::default().with_selected(Some(display_row(app.selected_article)));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_centered(f: &mut Frame, area: Rect, mut lines: Vec<Line<'static>>, app: &App) {
    let padding = area.height.saturating_sub(lines.len() as u16 + 2) / 2;
    for _ in 0..padding {
        lines.insert(0, Line::from(""));
    }
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hint_differs_by_mode() {
        assert_eq!(
            empty_hint(true),
            "Try searching with different keywords or browse by category."
        );
        assert_eq!(
            empty_hint(false),
            "No articles available for this category at the moment."
        );
    }
}
