//! The reader's event loop and terminal lifecycle.

use crate::app::{App, AppEvent};
use crate::retrieval::Phase;
use anyhow::Result;
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::helpers::{spawn_banner_loads, start_retrieval};
use super::input::handle_input;
use super::render::render;

/// What the loop should do after a key press.
pub enum Action {
    Continue,
    Quit,
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the reader until the user quits or a termination signal arrives.
///
/// One `tokio::select!` multiplexes, in priority order:
/// - SIGTERM / SIGINT
/// - crossterm key and resize events
/// - `AppEvent`s from background tasks
/// - engagement stats published by the store
/// - a 250ms tick driving status expiry and the spinner
///
/// The ad service is initialized, banner loads are started and the first
/// headline retrieval is issued before the first frame. The terminal is
/// restored on return and from a panic hook.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    install_restore_hook();
    let mut terminal = enter_tui()?;

    let mut keys = crossterm::event::EventStream::new();
    let mut stats_rx = app.stats_store.subscribe();
    let mut stats_open = true;
    let mut ticks = tokio::time::interval(TICK);

    app.ads.initialize();
    spawn_banner_loads(Arc::clone(&app.ads), &event_tx);
    let issued = app.initial_load();
    start_retrieval(app, issued, &event_tx);

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Apply finished work before waiting so bursts of typing do not
        // starve retrieval results.
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app, event);
            app.needs_redraw = true;
        }

        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        #[cfg(unix)]
        let (term_signal, int_signal) = (sigterm.recv(), sigint.recv());
        #[cfg(not(unix))]
        let (term_signal, int_signal) = (
            std::future::pending::<Option<()>>(),
            std::future::pending::<Option<()>>(),
        );

        tokio::select! {
            biased;

            _ = term_signal => {
                tracing::info!(signal = "SIGTERM", "Shutting down");
                break;
            }
            _ = int_signal => {
                tracing::info!(signal = "SIGINT", "Shutting down");
                break;
            }
            terminal_event = keys.next() => {
                let Some(terminal_event) = terminal_event else { break };
                if let Action::Quit = on_terminal_event(app, terminal_event, &event_tx) {
                    break;
                }
            }
            Some(event) = event_rx.recv() => {
                handle_app_event(app, event);
                app.needs_redraw = true;
            }
            changed = stats_rx.changed(), if stats_open => match changed {
                Ok(()) => {
                    app.stats = *stats_rx.borrow_and_update();
                    app.needs_redraw = true;
                }
                Err(_) => stats_open = false,
            },
            _ = ticks.tick() => handle_tick(app),
        }
    }

    leave_tui(terminal)
}

/// Loop tick period.
const TICK: Duration = Duration::from_millis(250);

fn on_terminal_event(
    app: &mut App,
    event: io::Result<Event>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match event {
        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
            app.needs_redraw = true;
            handle_input(app, key.code, key.modifiers, event_tx)
        }
        Ok(Event::Resize(..)) => {
            app.needs_redraw = true;
            Action::Continue
        }
        Ok(_) => Action::Continue,
        Err(e) => {
            tracing::warn!(error = %e, "Terminal event stream error");
            Action::Continue
        }
    }
}

/// Advance the spinner while anything is in flight.
fn handle_tick(app: &mut App) {
    let busy = app.retrieval.phase() == Phase::Loading
        || app.watching_rewarded
        || app.interstitial_active();
    if busy {
        app.spinner_frame = (app.spinner_frame + 1) % super::SPINNER.len();
        app.needs_redraw = true;
    }
}

/// Chain a panic hook that leaves raw mode and the alternate screen first.
fn install_restore_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}

fn enter_tui() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
}

fn leave_tui(mut terminal: Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
