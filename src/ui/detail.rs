//! Article detail overlay.

use crate::app::{App, MAX_SCROLL};
use crate::news::{clean_content, Article};
use crate::theme::Palette;
use crate::util::{display_width, format_long_date, strip_control_chars};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Build the overlay body for `article`.
pub(super) fn build_lines(article: &Article, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            palette.detail_title,
        )),
        Line::from(Span::styled(
            format!(
                "By {} • {}",
                strip_control_chars(&article.author),
                format_long_date(&article.published_at)
            ),
            palette.detail_meta,
        )),
        Line::from(""),
        Line::from(Span::styled(
            strip_control_chars(&article.description).into_owned(),
            palette.detail_body.add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ];

    let content = clean_content(&article.content);
    lines.extend(
        strip_control_chars(&content)
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), palette.detail_body))),
    );

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(article.url.clone(), palette.detail_link)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("[o] Read Full Article", palette.button)));
    lines
}

/// Display lines `lines` occupy once wrapped to `width` columns.
pub(super) fn wrapped_line_count(lines: &[Line<'_>], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}

/// Render the detail overlay centered over the browse layout.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let width = (area.width * 80 / 100).max(40).min(area.width.saturating_sub(2));
    let height = (area.height * 85 / 100).max(8).min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    let Some(article) = app.detail_article.as_ref() else {
        return;
    };

    let lines = build_lines(article, &app.theme);
    let title = format!(" {} ", strip_control_chars(&article.source.name));

    // Clamp before rendering so a resize never shows an empty page.
    let inner_width = overlay.width.saturating_sub(2) as usize;
    let inner_height = overlay.height.saturating_sub(2) as usize;
    let max_scroll = wrapped_line_count(&lines, inner_width).saturating_sub(inner_height);
    app.detail_scroll = app.detail_scroll.min(max_scroll).min(MAX_SCROLL);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_focused)
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll as u16, 0));

    f.render_widget(Clear, overlay);
    f.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::ArticleSource;

    fn article() -> Article {
        Article {
            source: ArticleSource {
                id: Some("wire".to_string()),
                name: "The Wire".to_string(),
            },
            author: "Ada Lovelace".to_string(),
            title: "Engines\x1b[31m ahead".to_string(),
            description: "A look at engines.".to_string(),
            url: "https://example.com/engines".to_string(),
            url_to_image: String::new(),
            published_at: "2024-03-01T12:05:00Z".to_string(),
            content: "First line\nSecond line [+1200 chars]".to_string(),
        }
    }

    fn text_of(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_build_lines_sections() {
        let lines = text_of(&build_lines(&article(), &Palette::default()));
        assert_eq!(lines[1], "By Ada Lovelace • Friday, March 1, 2024 12:05");
        assert!(lines.contains(&"Second line ...".to_string()));
        assert!(lines.contains(&"https://example.com/engines".to_string()));
        assert_eq!(lines.last().unwrap(), "[o] Read Full Article");
    }

    #[test]
    fn test_build_lines_strips_escapes() {
        let lines = text_of(&build_lines(&article(), &Palette::default()));
        assert!(!lines[0].contains('\x1b'));
    }

    #[test]
    fn test_wrapped_line_count() {
        let lines = vec![Line::from("a".repeat(25)), Line::from(""), Line::from("short")];
        assert_eq!(wrapped_line_count(&lines, 10), 3 + 1 + 1);
        assert_eq!(wrapped_line_count(&lines, 0), 3);
    }
}
