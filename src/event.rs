use crate::binance::types::BinanceTickerPrice;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A fetch completed; `seq` is the dispatch order of that fetch.
    PricesFetched {
        seq: u64,
        prices: Vec<BinanceTickerPrice>,
    },
    FetchFailed {
        seq: u64,
        error: String,
    },
    LogMessage(String),
}
