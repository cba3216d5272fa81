//! Render functions for the TUI.
//!
//! This module lays out the browse screen and stacks the detail and
//! interstitial overlays on top of it.

use crate::app::{App, BannerSlot, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{articles, banner, categories, detail, stats, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 20;

/// Width of the stats/ad sidebar when the terminal is wide enough for it.
const SIDEBAR_WIDTH: u16 = 34;
/// Below this width the sidebar is dropped.
const SIDEBAR_MIN_TOTAL_WIDTH: u16 = 90;

/// Main render dispatch function.
///
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // EDGE-001: Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    // EDGE-001: Minimum terminal size check for usable UI
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    if app.interstitial_active() {
        banner::render_interstitial(f, app);
        return;
    }

    render_browse(f, app);

    if app.view == View::Detail {
        detail::render(f, app);
    }
}

/// Render the browse layout: header, banners, category bar, list, sidebar, status.
fn render_browse(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(4), // top banner
            Constraint::Length(1), // category bar
            Constraint::Min(0),    // main
            Constraint::Length(4), // bottom banner
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_header(f, app, rows[0]);
    banner::render(f, app, rows[1], BannerSlot::Top);
    categories::render(f, app, rows[2]);
    render_main(f, app, rows[3]);
    banner::render(f, app, rows[4], BannerSlot::Bottom);
    status::render(f, app, rows[5]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" 📰 NewsReel ", app.theme.header)];

    if app.search_mode {
        spans.push(Span::raw("  Search: "));
        spans.push(Span::raw(format!("{}_", app.search_input)));
    } else if app.retrieval.is_searching() {
        spans.push(Span::raw(format!(
            "  Search: {}  (Esc to clear)",
            app.retrieval.state().search_query.trim()
        )));
    } else {
        spans.push(Span::styled("  Press / to search news", app.theme.summary));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Article list on the left, stats panel and sidebar ad on the right.
fn render_main(f: &mut Frame, app: &App, area: Rect) {
    if area.width < SIDEBAR_MIN_TOTAL_WIDTH {
        articles::render(f, app, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);

    articles::render(f, app, columns[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(columns[1]);

    stats::render(f, app, sidebar[0]);
    banner::render(f, app, sidebar[1], BannerSlot::Sidebar);
}
