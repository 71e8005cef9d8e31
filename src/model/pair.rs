/// A trading pair tracked on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPair {
    /// Exchange symbol, e.g. `BTCBUSD`.
    pub symbol: String,
    /// Display name, e.g. `BTC/BUSD`.
    pub label: String,
}

impl TrackedPair {
    pub fn new(symbol: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            label: label.into(),
        }
    }
}
