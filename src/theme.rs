//! Color roles for the TUI.
//!
//! Widgets never pick colors directly; they read the role they draw from
//! [`Palette`].

use ratatui::style::{Color, Modifier, Style};

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct Palette {
    // -- Chrome --
    pub header: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,

    // -- Category bar --
    pub category_active: Style,
    pub category_normal: Style,

    // -- Article list --
    pub heading: Style,
    pub summary: Style,
    pub article_title: Style,
    pub article_selected: Style,
    pub article_meta: Style,
    pub article_description: Style,

    // -- States --
    pub loading: Style,
    pub error: Style,
    pub empty: Style,

    // -- Ads --
    pub ad_placeholder: Style,
    pub ad_sponsored: Style,
    pub ad_id: Style,

    // -- Stats --
    pub stat_value: Style,
    pub stat_label: Style,
    pub button: Style,
    pub button_disabled: Style,

    // -- Detail --
    pub detail_title: Style,
    pub detail_meta: Style,
    pub detail_body: Style,
    pub detail_link: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            header: Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),

            category_active: Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD),
            category_normal: Style::default().fg(Color::Gray),

            heading: Style::default().add_modifier(Modifier::BOLD),
            summary: Style::default().fg(Color::DarkGray),
            article_title: Style::default().add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            article_meta: Style::default().fg(Color::DarkGray),
            article_description: Style::default().fg(Color::Gray),

            loading: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red),
            empty: Style::default().fg(Color::Gray),

            ad_placeholder: Style::default().fg(Color::DarkGray),
            ad_sponsored: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ad_id: Style::default().fg(Color::DarkGray),

            stat_value: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            stat_label: Style::default().fg(Color::Gray),
            button: Style::default().bg(Color::Magenta).fg(Color::White),
            button_disabled: Style::default().bg(Color::DarkGray).fg(Color::Gray),

            detail_title: Style::default().add_modifier(Modifier::BOLD),
            detail_meta: Style::default().fg(Color::DarkGray),
            detail_body: Style::default(),
            detail_link: Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_is_dark_gray() {
        assert_eq!(
            Palette::default().status_bar,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn selection_differs_from_plain_title() {
        let palette = Palette::dark();
        assert_ne!(palette.article_selected, palette.article_title);
    }
}
