//! Engagement stats panel.

use crate::app::App;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Label of the rewarded-ad button.
pub(super) fn button_label(watching: bool) -> &'static str {
    if watching {
        "Watching Ad..."
    } else {
        "[w] Watch Ad for Coins"
    }
}

/// Render the "Your Stats" panel: three counters and the rewarded-ad button.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 10 || area.height < 5 {
        return;
    }

    let counters = [
        ("Articles Read", app.stats.articles_read),
        ("Coins Earned", app.stats.coins_earned),
        ("Ads Watched", app.stats.ads_watched),
    ];
    let mut lines: Vec<Line> = counters
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<15}", label), app.theme.stat_label),
                Span::styled(value.to_string(), app.theme.stat_value),
            ])
        })
        .collect();

    let button_style = if app.watching_rewarded {
        app.theme.button_disabled
    } else {
        app.theme.button
    };
    lines.push(Line::from(Span::styled(
        button_label(app.watching_rewarded),
        button_style,
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.panel_border)
            .title(" Your Stats "),
    );
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_label_disabled_while_watching() {
        assert_eq!(button_label(false), "[w] Watch Ad for Coins");
        assert_eq!(button_label(true), "Watching Ad...");
    }
}
