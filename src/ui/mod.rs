pub mod dashboard;

use std::collections::HashMap;

use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::delta::build_snapshots;
use crate::event::AppEvent;
use crate::input::Focus;
use crate::model::pair::TrackedPair;
use crate::model::snapshot::{PercentChangeType, PriceSnapshot};
use crate::poller::{PollerPhase, PollingState};
use crate::ticker_set::TickerSet;

use dashboard::{AddPairForm, KeybindBar, LogPanel, StatusBar, TickerBoard};

const DEFAULT_MAX_LOG_MESSAGES: usize = 200;

/// Render data for one price tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileView {
    pub symbol: String,
    pub label: String,
    pub price: f64,
    pub change_type: PercentChangeType,
    pub change: String,
    pub loading: bool,
}

impl TileView {
    pub fn signed_change(&self) -> String {
        format!("{}{}%", self.change_type.sign(), self.change)
    }
}

pub struct AppState {
    pub tickers: TickerSet,
    /// `None` until the first successful fetch.
    pub snapshots: Option<HashMap<String, PriceSnapshot>>,
    pub polling: PollingState,
    /// Highest fetch sequence number applied to `snapshots`.
    pub last_applied_seq: u64,
    pub label_input: String,
    pub symbol_input: String,
    pub focus: Focus,
    pub fetch_count: u64,
    pub failed_fetch_count: u64,
    pub last_update: Option<DateTime<Local>>,
    pub interval_ms: u64,
    pub log_messages: Vec<String>,
    pub max_log_messages: usize,
}

impl AppState {
    pub fn new(tickers: TickerSet, interval_ms: u64) -> Self {
        Self {
            tickers,
            snapshots: None,
            polling: PollingState::default(),
            last_applied_seq: 0,
            label_input: String::new(),
            symbol_input: String::new(),
            focus: Focus::default(),
            fetch_count: 0,
            failed_fetch_count: 0,
            last_update: None,
            interval_ms,
            log_messages: Vec::new(),
            max_log_messages: DEFAULT_MAX_LOG_MESSAGES,
        }
    }

    pub fn with_max_log_messages(mut self, max: usize) -> Self {
        self.max_log_messages = max.max(1);
        self
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > self.max_log_messages {
            let excess = self.log_messages.len() - self.max_log_messages;
            self.log_messages.drain(..excess);
        }
    }

    pub fn phase(&self) -> PollerPhase {
        self.polling.phase()
    }

    pub fn set_polling(&mut self, polling: bool) {
        self.polling.polling = polling;
    }

    /// Text of the pause/resume control.
    pub fn toggle_label(&self) -> &'static str {
        if self.polling.polling {
            "Stop update"
        } else {
            "Start update"
        }
    }

    /// Mirrors the disabled "Add ticker" button.
    pub fn can_submit(&self) -> bool {
        !self.label_input.trim().is_empty() && !self.symbol_input.trim().is_empty()
    }

    /// Add the pair from the form; clears both inputs on success.
    pub fn submit_pair(&mut self) -> bool {
        if !self
            .tickers
            .add_pair(&self.symbol_input, &self.label_input)
        {
            return false;
        }
        let added = format!(
            "Tracking {} ({})",
            self.label_input.trim(),
            self.symbol_input.trim().to_ascii_uppercase()
        );
        self.label_input.clear();
        self.symbol_input.clear();
        self.push_log(added);
        true
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            Focus::Label => self.label_input.push(c),
            Focus::Symbol => self.symbol_input.push(c),
            Focus::Board => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Focus::Label => {
                self.label_input.pop();
            }
            Focus::Symbol => {
                self.symbol_input.pop();
            }
            Focus::Board => {}
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PricesFetched { seq, prices } => {
                self.polling.loading = false;
                if seq <= self.last_applied_seq {
                    tracing::debug!(
                        seq,
                        last_applied = self.last_applied_seq,
                        "Discarding stale price fetch"
                    );
                    self.push_log(format!(
                        "Discarded stale fetch #{} (already showing #{})",
                        seq, self.last_applied_seq
                    ));
                    return;
                }
                let next = build_snapshots(&prices, self.snapshots.as_ref(), self.tickers.labels());
                self.snapshots = Some(next);
                self.last_applied_seq = seq;
                self.fetch_count += 1;
                self.last_update = Some(Local::now());
            }
            AppEvent::FetchFailed { seq, error } => {
                self.polling.loading = false;
                self.failed_fetch_count += 1;
                self.push_log(format!("[ERR] fetch #{} failed: {}", seq, error));
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
        }
    }

    pub fn tile_for(&self, pair: &TrackedPair) -> TileView {
        let snapshot = self
            .snapshots
            .as_ref()
            .and_then(|snaps| snaps.get(&pair.symbol))
            .cloned()
            .unwrap_or_else(|| {
                PriceSnapshot::fallback(&pair.symbol, self.tickers.label_of(&pair.symbol))
            });
        TileView {
            symbol: pair.symbol.clone(),
            label: snapshot.label.unwrap_or_else(|| pair.label.clone()),
            price: snapshot.price,
            change_type: snapshot.change_type,
            change: snapshot.change,
            loading: self.polling.loading,
        }
    }

    /// Tiles in tracked order.
    pub fn tiles(&self) -> Vec<TileView> {
        self.tickers
            .pairs()
            .iter()
            .map(|pair| self.tile_for(pair))
            .collect()
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // add-pair form
            Constraint::Min(5),    // tiles
            Constraint::Length(6), // system log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            phase: state.phase(),
            toggle_label: state.toggle_label(),
            interval_ms: state.interval_ms,
            fetch_count: state.fetch_count,
            failed_fetch_count: state.failed_fetch_count,
            last_update: state.last_update,
        },
        outer[0],
    );

    frame.render_widget(
        AddPairForm {
            label: &state.label_input,
            symbol: &state.symbol_input,
            focus: state.focus,
            can_submit: state.can_submit(),
        },
        outer[1],
    );

    let tiles = state.tiles();
    frame.render_widget(TickerBoard::new(&tiles), outer[2]);

    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);

    frame.render_widget(
        KeybindBar {
            focus: state.focus,
            toggle_label: state.toggle_label(),
        },
        outer[4],
    );
}
