mod app;
mod config;
mod form;
mod logging;
mod nav;
mod prefs;
mod table_filter;
mod ui;

use crate::app::action::Action;
use crate::app::event::{AppEvent, Timer};
use crate::app::handler;
use crate::app::state::AppState;
use crate::form::{FormClient, FormPayload, SubmissionId};
use crate::logging::SubmissionLog;
use crate::prefs::theme::system_prefers_dark;
use crate::prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load config
    let cfg = config::load_config()?;
    let _log_guard = logging::init_tracing(&cfg.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "starting scoutdeck");

    let prefs = open_prefs();
    let client = FormClient::new(cfg.server.request_timeout())
        .context("Failed to build HTTP client")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg, prefs, client).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Open the preference file, falling back to a session-only store.
fn open_prefs() -> Box<dyn PreferenceStore> {
    let path = config::prefs_path();
    match FilePreferenceStore::open(&path) {
        Ok(store) => {
            debug!(path = %store.path().display(), "preferences loaded");
            Box::new(store)
        }
        Err(e) => {
            warn!(error = %e, "preferences unavailable; changes will not be saved");
            Box::new(MemoryPreferenceStore::new())
        }
    }
}

fn start_timer(tx: &UnboundedSender<AppEvent>, timer: Timer) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(timer.after).await;
        let _ = tx.send(AppEvent::TimerFired(timer.kind));
    });
}

fn spawn_submit(
    client: &FormClient,
    tx: &UnboundedSender<AppEvent>,
    id: SubmissionId,
    action_url: String,
    payload: FormPayload,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.submit(&action_url, payload.encode()).await;
        let _ = tx.send(AppEvent::SubmitFinished { id, payload, outcome });
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    prefs: Box<dyn PreferenceStore>,
    client: FormClient,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let now = Instant::now();
    let mut state = AppState::new(cfg.clone(), prefs, now).context("Failed to build start page")?;
    state.themes().load(system_prefers_dark());
    let mut submission_log = SubmissionLog::new(&cfg.logging);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if term_tx.send(AppEvent::Terminal(event)).is_err() {
                break;
            }
        }
    });

    // Spawn tick task
    let tick_tx = event_tx.clone();
    let tick_rate = cfg.ui.tick_rate();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_rate);
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // The first page fades in like every later one
    start_timer(&event_tx, state.nav.load(now));

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    loop {
        let Some(event) = event_rx.recv().await else { break };

        if let AppEvent::SubmitFinished { payload, outcome, .. } = &event {
            submission_log.record(payload, outcome);
        }

        let actions = handler::handle_event(&mut state, event);

        // Process actions
        for action in actions {
            match action {
                Action::SubmitForm { id, action_url, payload } => {
                    spawn_submit(&client, &event_tx, id, action_url, payload);
                }
                Action::StartTimer(timer) => start_timer(&event_tx, timer),
                Action::Quit => state.should_quit = true,
            }
        }

        if state.should_quit {
            info!("quitting");
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}
