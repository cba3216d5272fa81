//! Ad placeholders: banner slots and the full-screen interstitial.

use crate::app::{App, BannerSlot};
use crate::util::id_suffix;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Characters of the unit id shown under a filled slot.
const AD_ID_CHARS: usize = 8;

/// Text of a banner slot: a loading placeholder until the banner resolves.
pub(super) fn banner_lines(app: &App, slot: BannerSlot) -> Vec<Line<'static>> {
    let palette = &app.theme;
    if !app.banner_loaded(slot) {
        return vec![Line::from(Span::styled("Loading Ad...", palette.ad_placeholder))];
    }

    vec![
        Line::from(vec![
            Span::styled("[Ad] ", palette.ad_sponsored),
            Span::styled("Sponsored Content", palette.ad_sponsored),
            Span::raw(" · "),
            Span::styled(slot.headline(), palette.article_title),
        ]),
        Line::from(Span::styled(
            format!(
                "Ad ID: {}",
                id_suffix(&app.ads.units().banner_id, AD_ID_CHARS)
            ),
            palette.ad_id,
        )),
    ]
}

/// Render one banner slot inside a bordered box.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect, slot: BannerSlot) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let paragraph = Paragraph::new(banner_lines(app, slot))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Full-screen interstitial shown while one is playing.
pub(super) fn render_interstitial(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(Clear, area);

    let spinner = super::SPINNER[app.spinner_frame % super::SPINNER.len()];
    let padding = area.height.saturating_sub(6) / 2;
    let mut lines: Vec<Line<'static>> = (0..padding).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled("Advertisement", app.theme.ad_sponsored)));
    lines.push(Line::from(""));
    lines.push(Line::from(format!("{} Your article will continue shortly", spinner)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Ad ID: {}",
            id_suffix(&app.ads.units().interstitial_id, AD_ID_CHARS)
        ),
        app.theme.ad_id,
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_focused)
                .title(" Sponsored "),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
