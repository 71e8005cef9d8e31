use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::binance::types::BinanceTickerPrice;
use crate::config::{OverlapPolicy, PollConfig};
use crate::event::AppEvent;

/// Abstract batch price endpoint.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch current prices for exactly `symbols` in one round trip.
    async fn fetch_prices(&self, symbols: &[String]) -> Result<Vec<BinanceTickerPrice>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerPhase {
    /// Waiting for the first fetch to complete.
    Initial,
    Active,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingState {
    pub loading: bool,
    pub polling: bool,
}

impl Default for PollingState {
    fn default() -> Self {
        Self {
            loading: true,
            polling: true,
        }
    }
}

impl PollingState {
    pub fn phase(&self) -> PollerPhase {
        if !self.polling {
            PollerPhase::Paused
        } else if self.loading {
            PollerPhase::Initial
        } else {
            PollerPhase::Active
        }
    }
}

/// Owner of the background polling task.
///
/// `shutdown` stops scheduling and waits for the task; dropping the handle
/// aborts it. Fetches already in flight are never cancelled.
pub struct PollerHandle {
    polling_tx: watch::Sender<bool>,
    shutdown_tx: watch::Sender<bool>,
    dispatched: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn set_polling(&self, polling: bool) {
        self.polling_tx.send_replace(polling);
    }

    /// Flip the pause flag and return the new value.
    pub fn toggle(&self) -> bool {
        let next = !*self.polling_tx.borrow();
        self.set_polling(next);
        next
    }

    pub fn is_polling(&self) -> bool {
        *self.polling_tx.borrow()
    }

    /// Number of fetches dispatched so far (also the last sequence number).
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Poller task ended abnormally");
            }
        }
        tracing::info!("Poller stopped");
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

pub struct Poller<S> {
    source: Arc<S>,
    symbols_rx: watch::Receiver<Vec<String>>,
    events_tx: mpsc::Sender<AppEvent>,
    period: Duration,
    overlap: OverlapPolicy,
    dispatched: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
}

impl<S: PriceSource + 'static> Poller<S> {
    /// Fire one fetch immediately, then every `config.interval_ms` while
    /// polling is enabled.
    pub fn start(
        source: Arc<S>,
        symbols_rx: watch::Receiver<Vec<String>>,
        config: &PollConfig,
        events_tx: mpsc::Sender<AppEvent>,
    ) -> PollerHandle {
        let (polling_tx, polling_rx) = watch::channel(true);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let dispatched = Arc::new(AtomicU64::new(0));
        let in_flight = Arc::new(AtomicUsize::new(0));

        let poller = Poller {
            source,
            symbols_rx,
            events_tx,
            period: config.interval(),
            overlap: config.overlap,
            dispatched: dispatched.clone(),
            in_flight: in_flight.clone(),
        };
        tracing::info!(
            interval_ms = config.interval_ms,
            overlap = ?config.overlap,
            "Starting poller"
        );
        let task = tokio::spawn(poller.run(polling_rx, shutdown_rx));

        PollerHandle {
            polling_tx,
            shutdown_tx,
            dispatched,
            in_flight,
            task: Some(task),
        }
    }

    async fn run(self, mut polling_rx: watch::Receiver<bool>, mut shutdown_rx: watch::Receiver<bool>) {
        self.dispatch();

        let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let polling = *polling_rx.borrow_and_update();
            tokio::select! {
                _ = ticker.tick(), if polling => {
                    self.dispatch();
                }
                changed = polling_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let resumed = *polling_rx.borrow();
                    let msg = if resumed {
                        // Next fetch one full period from now.
                        ticker.reset();
                        tracing::info!("Polling resumed");
                        "Price updates resumed"
                    } else {
                        tracing::info!("Polling paused");
                        "Price updates paused"
                    };
                    let _ = self.events_tx.send(AppEvent::LogMessage(msg.to_string())).await;
                }
                _ = shutdown_rx.changed() => {
                    break;
                }
            }
        }
    }

    fn dispatch(&self) {
        if self.overlap == OverlapPolicy::Serialize && self.in_flight.load(Ordering::SeqCst) > 0 {
            tracing::debug!("Previous fetch still in flight, skipping tick");
            return;
        }

        let seq = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        let symbols = self.symbols_rx.borrow().clone();
        let source = self.source.clone();
        let events_tx = self.events_tx.clone();
        let in_flight = self.in_flight.clone();
        in_flight.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(seq, symbols = symbols.len(), "Dispatching price fetch");

        tokio::spawn(async move {
            let event = match source.fetch_prices(&symbols).await {
                Ok(prices) => AppEvent::PricesFetched { seq, prices },
                Err(e) => {
                    tracing::warn!(seq, error = %e, "Price fetch failed");
                    AppEvent::FetchFailed {
                        seq,
                        error: format!("{:#}", e),
                    }
                }
            };
            in_flight.fetch_sub(1, Ordering::SeqCst);
            let _ = events_tx.send(event).await;
        });
    }
}
