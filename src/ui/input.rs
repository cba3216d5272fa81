//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on current view and mode.

use crate::app::{App, AppEvent, View};
use crate::news::Category;
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::helpers::{
    open_focused_article, share_focused_article, spawn_article_read, start_retrieval,
    start_rewarded,
};
use super::Action;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on current mode and view.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // The interstitial is full screen and swallows input until it finishes.
    if app.interstitial_active() {
        return Action::Continue;
    }

    if app.search_mode {
        handle_search_input(app, code, event_tx);
        return Action::Continue;
    }

    match app.view {
        View::Browse => handle_browse_input(app, code, event_tx),
        View::Detail => handle_detail_input(app, code, event_tx),
    }
}

/// Handle input in browse view (category bar, article list, sidebar).
fn handle_browse_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Enter => {
            if app.open_detail().is_some() {
                spawn_article_read(
                    Arc::clone(&app.stats_store),
                    Arc::clone(&app.ads),
                    event_tx.clone(),
                );
            }
        }
        KeyCode::Char('/') => {
            app.search_mode = true;
            app.search_input = app.retrieval.state().search_query.clone();
        }
        KeyCode::Esc => {
            // Leave search results and go back to the category
            if app.retrieval.is_searching() {
                app.search_input.clear();
                let issued = app.submit_search();
                start_retrieval(app, issued, event_tx);
            }
        }
        KeyCode::Tab | KeyCode::Char('l') => {
            let next = app.category().next();
            switch_category(app, next, event_tx);
        }
        KeyCode::BackTab | KeyCode::Char('h') => {
            let prev = app.category().prev();
            switch_category(app, prev, event_tx);
        }
        KeyCode::Char(c @ '1'..='7') => {
            let index = (c as usize) - ('1' as usize);
            if let Some(&category) = Category::ALL.get(index) {
                switch_category(app, category, event_tx);
            }
        }
        KeyCode::Char('r') => {
            let issued = app.refresh();
            start_retrieval(app, issued, event_tx);
        }
        KeyCode::Char('w') => start_rewarded(app, event_tx),
        KeyCode::Char('o') => open_focused_article(app),
        _ => {}
    }
    Action::Continue
}

/// Handle input while the detail overlay is open.
fn handle_detail_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc | KeyCode::Char('b') => app.close_detail(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_down(10),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::Char('o') => open_focused_article(app),
        KeyCode::Char('s') => share_focused_article(app, &mut std::io::stdout()),
        KeyCode::Char('w') => start_rewarded(app, event_tx),
        _ => {}
    }
    Action::Continue
}

/// Handle input while editing the search line.
fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc => {
            app.search_mode = false;
            app.search_input = app.retrieval.state().search_query.clone();
        }
        KeyCode::Enter => {
            let issued = app.submit_search();
            start_retrieval(app, issued, event_tx);
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            // Prevent input beyond max search length
            if app.search_input.len() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return;
            }
            if !c.is_control() {
                app.search_input.push(c);
            }
        }
        _ => {}
    }
}

fn switch_category(app: &mut App, category: Category, event_tx: &mpsc::Sender<AppEvent>) {
    // Re-selecting the active category while browsing it is a no-op.
    if category == app.category() && !app.retrieval.is_searching() {
        return;
    }
    let issued = app.change_category(category);
    start_retrieval(app, issued, event_tx);
}
