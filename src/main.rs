use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use ratatui::DefaultTerminal;
use tokio::sync::{mpsc, watch};

use ticker_board::binance::rest::BinanceRestClient;
use ticker_board::config::Config;
use ticker_board::event::AppEvent;
use ticker_board::input::{is_interrupt, parse_command, Focus, UiCommand};
use ticker_board::poller::{Poller, PollerHandle};
use ticker_board::ticker_set::TickerSet;
use ticker_board::ui::{self, AppState};

const LOG_FILE: &str = "ticker-board.log";

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    if config.source.is_none() {
        tracing::info!("Config file not found, using built-in defaults");
    }

    let tickers = TickerSet::from_config(&config.binance.initial_pairs());
    tracing::info!(
        config = %config.source_description(),
        rest_url = %config.binance.rest_base_url,
        pairs = tickers.len(),
        interval_ms = config.poll.interval_ms,
        "Starting ticker-board"
    );

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (symbols_tx, symbols_rx) = watch::channel(tickers.symbols());
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let rest_client = Arc::new(BinanceRestClient::new(&config.binance.rest_base_url));
    let poller = Poller::start(rest_client, symbols_rx, &config.poll, app_tx.clone());

    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    let mut app_state =
        AppState::new(tickers, config.poll.interval_ms).with_max_log_messages(config.ui.max_log_messages);
    app_state.push_log(format!(
        "ticker-board started | {} pairs | every {}ms | config: {}",
        app_state.tickers.len(),
        config.poll.interval_ms,
        config.source_description()
    ));

    let mut terminal = ratatui::init();
    let result = run_app(
        &mut terminal,
        &mut app_state,
        &poller,
        &symbols_tx,
        &mut app_rx,
        &mut shutdown_rx,
        config.ui.refresh_rate_ms,
    );
    ratatui::restore();

    poller.shutdown().await;
    tracing::info!("Shutdown complete");
    if let Err(e) = &result {
        tracing::error!(error = %e, "UI loop failed");
    }
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    app_state: &mut AppState,
    poller: &PollerHandle,
    symbols_tx: &watch::Sender<Vec<String>>,
    app_rx: &mut mpsc::Receiver<AppEvent>,
    shutdown_rx: &mut watch::Receiver<bool>,
    refresh_rate_ms: u64,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, &*app_state))?;

        if crossterm::event::poll(Duration::from_millis(refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    if is_interrupt(&key) {
                        tracing::info!("User interrupt");
                        break;
                    }
                    if let Some(cmd) = parse_command(&key.code, app_state.focus) {
                        if handle_command(cmd, app_state, poller, symbols_tx) {
                            tracing::info!("User quit");
                            break;
                        }
                    }
                }
            }
        }

        while let Ok(evt) = app_rx.try_recv() {
            app_state.apply(evt);
        }

        if *shutdown_rx.borrow_and_update() {
            break;
        }
    }
    Ok(())
}

/// Returns `true` when the app should exit.
fn handle_command(
    cmd: UiCommand,
    app_state: &mut AppState,
    poller: &PollerHandle,
    symbols_tx: &watch::Sender<Vec<String>>,
) -> bool {
    match cmd {
        UiCommand::Quit => return true,
        UiCommand::TogglePolling => {
            let polling = poller.toggle();
            app_state.set_polling(polling);
        }
        UiCommand::FocusNext => app_state.focus = app_state.focus.next(),
        UiCommand::FocusPrev => app_state.focus = app_state.focus.prev(),
        UiCommand::FocusBoard => app_state.focus = Focus::Board,
        UiCommand::FocusForm => app_state.focus = Focus::Label,
        UiCommand::Submit => {
            if app_state.submit_pair() {
                symbols_tx.send_replace(app_state.tickers.symbols());
                app_state.focus = Focus::Label;
            }
        }
        UiCommand::Backspace => app_state.backspace(),
        UiCommand::Input(c) => app_state.input_char(c),
    }
    false
}
