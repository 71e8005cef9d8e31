use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::PairConfig;
use crate::model::pair::TrackedPair;

/// Ordered, append-only set of tracked pairs with a derived symbol -> label map.
///
/// The map is built on first lookup and dropped whenever a pair is appended.
#[derive(Debug, Clone, Default)]
pub struct TickerSet {
    pairs: Vec<TrackedPair>,
    labels: OnceLock<HashMap<String, String>>,
}

impl TickerSet {
    pub fn new(pairs: impl IntoIterator<Item = TrackedPair>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
            labels: OnceLock::new(),
        }
    }

    pub fn from_config(pairs: &[PairConfig]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|p| TrackedPair::new(p.symbol.clone(), p.label.clone())),
        )
    }

    /// Append a pair. Blank symbol or label is a silent no-op; returns
    /// whether the pair was added.
    pub fn add_pair(&mut self, symbol: &str, label: &str) -> bool {
        let symbol = symbol.trim();
        let label = label.trim();
        if symbol.is_empty() || label.is_empty() {
            return false;
        }
        self.pairs
            .push(TrackedPair::new(symbol.to_ascii_uppercase(), label));
        self.labels.take();
        tracing::info!(symbol = %symbol.to_ascii_uppercase(), label, "Tracked pair added");
        true
    }

    pub fn label_of(&self, symbol: &str) -> Option<&str> {
        self.labels().get(symbol).map(String::as_str)
    }

    // Later entries win for duplicate symbols.
    pub fn labels(&self) -> &HashMap<String, String> {
        self.labels.get_or_init(|| {
            self.pairs
                .iter()
                .map(|p| (p.symbol.clone(), p.label.clone()))
                .collect()
        })
    }

    pub fn pairs(&self) -> &[TrackedPair] {
        &self.pairs
    }

    /// Symbols in insertion order, as sent to the price endpoint.
    pub fn symbols(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.symbol.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btc_only() -> TickerSet {
        TickerSet::new([TrackedPair::new("BTCBUSD", "BTC/BUSD")])
    }

    #[test]
    fn add_pair_rejects_blank_fields() {
        let mut set = btc_only();
        assert!(!set.add_pair("", "ETH/BUSD"));
        assert!(!set.add_pair("ETHBUSD", ""));
        assert!(!set.add_pair("   ", "ETH/BUSD"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.labels().len(), 1);
    }

    #[test]
    fn add_pair_appends_in_order_and_updates_labels() {
        let mut set = btc_only();
        assert!(set.add_pair("ethbusd", "ETH/BUSD"));
        assert_eq!(set.symbols(), vec!["BTCBUSD".to_string(), "ETHBUSD".to_string()]);
        assert_eq!(set.label_of("ETHBUSD"), Some("ETH/BUSD"));
        assert_eq!(set.label_of("BTCBUSD"), Some("BTC/BUSD"));
        assert_eq!(set.label_of("BNBBUSD"), None);
    }

    #[test]
    fn duplicate_symbol_takes_latest_label() {
        let mut set = btc_only();
        assert!(set.add_pair("BTCBUSD", "Bitcoin"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.label_of("BTCBUSD"), Some("Bitcoin"));
    }

    #[test]
    fn lookup_after_append_sees_new_pair() {
        let mut set = btc_only();
        assert_eq!(set.label_of("ETHBUSD"), None);
        assert_eq!(set.labels().len(), 1);

        assert!(set.add_pair("ETHBUSD", "ETH/BUSD"));
        assert_eq!(set.label_of("ETHBUSD"), Some("ETH/BUSD"));
        assert_eq!(set.labels().len(), 2);

        assert!(set.add_pair("ETHBUSD", "Ether"));
        assert_eq!(set.label_of("ETHBUSD"), Some("Ether"));
    }
}
