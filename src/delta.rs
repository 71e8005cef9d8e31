//! Price delta derivation between two consecutive fetch cycles.

use std::collections::HashMap;

use rust_decimal::prelude::RoundingStrategy;
use rust_decimal::Decimal;

use crate::binance::types::BinanceTickerPrice;
use crate::model::snapshot::{PercentChangeType, PriceSnapshot};

/// Classify the move from `prior` to `current` by plain comparison.
/// `build_snapshots` handles the zero-prior ("no observation") case itself.
pub fn classify(prior: f64, current: f64) -> PercentChangeType {
    if prior > current {
        PercentChangeType::Decreased
    } else if prior < current {
        PercentChangeType::Increased
    } else {
        PercentChangeType::Default
    }
}

/// `|100 - 100 * current / prior|` with four decimals; `"0.0000"` when
/// there is no prior price. Exact midpoints round away from zero.
pub fn percent_change_magnitude(prior: f64, current: f64) -> String {
    let change = if prior == 0.0 {
        0.0
    } else {
        (100.0 - (100.0 * current) / prior).abs()
    };
    match Decimal::from_f64_retain(change) {
        Some(exact) => {
            let mut rounded = exact.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(4);
            rounded.to_string()
        }
        // Out of Decimal range.
        None => format!("{:.4}", change),
    }
}

/// Build the next snapshot store from a fetch response.
///
/// Symbols absent from `records` are dropped; the caller replaces its store
/// with the returned map.
pub fn build_snapshots(
    records: &[BinanceTickerPrice],
    previous: Option<&HashMap<String, PriceSnapshot>>,
    labels: &HashMap<String, String>,
) -> HashMap<String, PriceSnapshot> {
    let mut out = HashMap::with_capacity(records.len());
    for record in records {
        let price = record.price;
        let prior = previous
            .and_then(|prev| prev.get(&record.symbol))
            .map(|snap| snap.price)
            .unwrap_or(0.0);

        let change_type = if prior == 0.0 {
            PercentChangeType::Default
        } else {
            classify(prior, price)
        };

        out.insert(
            record.symbol.clone(),
            PriceSnapshot {
                symbol: record.symbol.clone(),
                price,
                change_type,
                change: percent_change_magnitude(prior, price),
                label: labels.get(&record.symbol).cloned(),
            },
        );
    }
    out
}
