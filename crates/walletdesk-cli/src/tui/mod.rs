//! Two-thread TUI orchestration.
//!
//! Terminal I/O runs on a dedicated OS thread; all HTTP work stays on the
//! tokio runtime. Key events arrive through a `tokio::sync::mpsc` channel.
//! Backend requests run on spawned tasks and report back through a second
//! channel, so the screen keeps redrawing while they are in flight.

mod input;
#[cfg(test)]
mod input_tests;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use walletdesk_core::ApiClient;

use crate::app::App;
use crate::context::Context;
use crate::pages::{Outcome, Request, Route};
use crate::ui;

pub use input::handle_key;

/// Terminal events forwarded from the UI reader thread.
pub enum TermEvent {
    Key(crossterm::event::KeyEvent),
    Resize(u16, u16),
}

/// Run the interactive TUI until the operator quits.
pub async fn run(ctx: Context) -> anyhow::Result<()> {
    let Context { settings, api } = ctx;
    let mut app = App::new(&settings.ui);
    let api = Arc::new(api.with_observer(app.observer()));
    info!(api = api.base_url(), "Starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let cancel = CancellationToken::new();
    let (term_tx, mut term_rx) = mpsc::channel::<TermEvent>(64);

    let cancel_clone = cancel.clone();
    let ui_thread = std::thread::spawn(move || {
        loop {
            if cancel_clone.is_cancelled() {
                break;
            }
            // Poll with 50ms timeout so we can check cancellation
            if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                match event::read() {
                    Ok(Event::Key(key)) => {
                        // Windows emits Press + Release per keystroke
                        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                            continue;
                        }
                        if term_tx.blocking_send(TermEvent::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(Event::Resize(w, h)) => {
                        if term_tx.blocking_send(TermEvent::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
    });

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Outcome>();
    let mut tick = tokio::time::interval(Duration::from_millis(50));
    spawn_requests(&api, &done_tx, app.navigate(&api, Route::Dashboard));

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = terminal.draw(|f| ui::draw(f, &app)) {
                    break Err(e.into());
                }
            }
            term_event = term_rx.recv() => {
                match term_event {
                    Some(TermEvent::Key(key)) => {
                        let requests = handle_key(&mut app, &api, key);
                        spawn_requests(&api, &done_tx, requests);
                    }
                    // Redrawn on the next tick.
                    Some(TermEvent::Resize(..)) => {}
                    None => break Ok(()),
                }
            }
            Some(outcome) = done_rx.recv() => {
                let follow_up = app.apply(&api, outcome);
                spawn_requests(&api, &done_tx, follow_up);
            }
        }
        if app.should_quit {
            break Ok(());
        }
    };

    cancel.cancel();
    let _ = ui_thread.join(); // fast: <50ms due to poll timeout

    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

/// Run each request on its own task; outcomes come back through `done_tx`.
fn spawn_requests(
    api: &Arc<ApiClient>,
    done_tx: &mpsc::UnboundedSender<Outcome>,
    requests: Vec<Request>,
) {
    for request in requests {
        let api = Arc::clone(api);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = request.execute(&api).await;
            // The loop has exited; nothing is left to update.
            let _ = done_tx.send(outcome);
        });
    }
}
