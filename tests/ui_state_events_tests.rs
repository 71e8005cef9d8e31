use ticker_board::binance::types::BinanceTickerPrice;
use ticker_board::event::AppEvent;
use ticker_board::input::Focus;
use ticker_board::model::pair::TrackedPair;
use ticker_board::model::snapshot::PercentChangeType;
use ticker_board::poller::PollerPhase;
use ticker_board::ticker_set::TickerSet;
use ticker_board::ui::AppState;

fn state() -> AppState {
    AppState::new(
        TickerSet::new([TrackedPair::new("BTCBUSD", "BTC/BUSD")]),
        5_000,
    )
}

fn fetched(seq: u64, prices: &[(&str, f64)]) -> AppEvent {
    AppEvent::PricesFetched {
        seq,
        prices: prices
            .iter()
            .map(|(symbol, price)| BinanceTickerPrice {
                symbol: symbol.to_string(),
                price: *price,
            })
            .collect(),
    }
}

#[test]
/// Verifies initial render data:
/// before any fetch, tiles are loading zero-state records.
fn tiles_are_loading_fallbacks_before_first_fetch() {
    let s = state();
    assert_eq!(s.phase(), PollerPhase::Initial);
    let tiles = s.tiles();
    assert_eq!(tiles.len(), 1);
    assert!(tiles[0].loading);
    assert_eq!(tiles[0].price, 0.0);
    assert_eq!(tiles[0].change_type, PercentChangeType::Default);
    assert_eq!(tiles[0].change, "0");
    assert_eq!(tiles[0].label, "BTC/BUSD");
}

#[test]
/// Verifies delta across cycles:
/// 100 -> 110 shows +10% increase, then 110 -> 99 shows 10% decrease.
fn consecutive_fetches_produce_deltas() {
    let mut s = state();
    s.apply(fetched(1, &[("BTCBUSD", 100.0)]));
    let tile = &s.tiles()[0];
    assert!(!tile.loading);
    assert_eq!(s.phase(), PollerPhase::Active);
    assert_eq!(tile.change_type, PercentChangeType::Default);
    assert_eq!(tile.change, "0.0000");

    s.apply(fetched(2, &[("BTCBUSD", 110.0)]));
    let tile = &s.tiles()[0];
    assert_eq!(tile.change_type, PercentChangeType::Increased);
    assert_eq!(tile.signed_change(), "+10.0000%");

    s.apply(fetched(3, &[("BTCBUSD", 99.0)]));
    let tile = &s.tiles()[0];
    assert_eq!(tile.change_type, PercentChangeType::Decreased);
    assert_eq!(tile.signed_change(), "-10.0000%");
    assert_eq!(s.fetch_count, 3);
}

#[test]
/// Verifies out-of-order completion:
/// an older fetch resolving after a newer one is discarded.
fn stale_results_are_discarded() {
    let mut s = state();
    s.apply(fetched(1, &[("BTCBUSD", 100.0)]));
    s.apply(fetched(3, &[("BTCBUSD", 120.0)]));
    s.apply(fetched(2, &[("BTCBUSD", 50.0)]));

    assert_eq!(s.last_applied_seq, 3);
    let tile = &s.tiles()[0];
    assert_eq!(tile.price, 120.0);
    assert_eq!(tile.change_type, PercentChangeType::Increased);
    assert_eq!(tile.change, "20.0000");
}

#[test]
/// Verifies missing symbol handling:
/// a response omitting a tracked symbol renders the zero-state fallback.
fn missing_symbol_falls_back_to_zero_state() {
    let mut s = state();
    assert!(s.tickers.add_pair("ETHBUSD", "ETH/BUSD"));
    s.apply(fetched(1, &[("BTCBUSD", 100.0), ("ETHBUSD", 10.0)]));
    s.apply(fetched(2, &[("BTCBUSD", 101.0)]));

    let tiles = s.tiles();
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[1].label, "ETH/BUSD");
    assert_eq!(tiles[1].price, 0.0);
    assert_eq!(tiles[1].change_type, PercentChangeType::Default);
    assert_eq!(tiles[1].change, "0");
}

#[test]
/// Verifies failure handling:
/// a failed fetch clears loading, keeps prior snapshots and logs the error.
fn failed_fetch_keeps_snapshots_and_clears_loading() {
    let mut s = state();
    s.apply(AppEvent::FetchFailed {
        seq: 1,
        error: "timeout".to_string(),
    });
    assert!(!s.polling.loading);
    assert!(s.snapshots.is_none());

    s.apply(fetched(2, &[("BTCBUSD", 100.0)]));
    s.apply(AppEvent::FetchFailed {
        seq: 3,
        error: "timeout".to_string(),
    });
    assert_eq!(s.tiles()[0].price, 100.0);
    assert_eq!(s.failed_fetch_count, 2);
    assert!(s
        .log_messages
        .iter()
        .any(|m| m.starts_with("[ERR]") && m.contains("timeout")));
}

#[test]
/// Verifies the add-pair form guard:
/// blank inputs are a no-op, complete inputs append one pair and clear the form.
fn submit_pair_requires_both_fields_and_clears_inputs() {
    let mut s = state();
    s.focus = Focus::Label;
    for c in "ETH/BUSD".chars() {
        s.input_char(c);
    }
    assert!(!s.can_submit());
    assert!(!s.submit_pair());
    assert_eq!(s.tickers.len(), 1);
    assert_eq!(s.label_input, "ETH/BUSD");

    s.focus = Focus::Symbol;
    for c in "ethbusdx".chars() {
        s.input_char(c);
    }
    s.backspace();
    assert!(s.can_submit());
    assert!(s.submit_pair());

    assert_eq!(
        s.tickers.symbols(),
        vec!["BTCBUSD".to_string(), "ETHBUSD".to_string()]
    );
    assert_eq!(s.tickers.label_of("ETHBUSD"), Some("ETH/BUSD"));
    assert!(s.label_input.is_empty());
    assert!(s.symbol_input.is_empty());
}

#[test]
/// Verifies pause toggle state:
/// pausing keeps displayed prices and flips the control label.
fn pausing_keeps_data_and_flips_toggle_label() {
    let mut s = state();
    s.apply(fetched(1, &[("BTCBUSD", 100.0)]));
    assert_eq!(s.toggle_label(), "Stop update");

    s.set_polling(false);
    assert_eq!(s.phase(), PollerPhase::Paused);
    assert_eq!(s.toggle_label(), "Start update");
    assert_eq!(s.tiles()[0].price, 100.0);

    s.set_polling(true);
    assert_eq!(s.toggle_label(), "Stop update");
    assert_eq!(s.phase(), PollerPhase::Active);
}

#[test]
/// Verifies label resolution uses the current pair list:
/// a pair added after a fetch gets its label on the next fetch.
fn labels_resolve_from_current_pairs() {
    let mut s = state();
    s.apply(fetched(1, &[("BTCBUSD", 100.0), ("BNBBUSD", 300.0)]));
    assert!(s.snapshots.as_ref().unwrap()["BNBBUSD"].label.is_none());

    assert!(s.tickers.add_pair("BNBBUSD", "BNB/BUSD"));
    s.apply(fetched(2, &[("BTCBUSD", 100.0), ("BNBBUSD", 303.0)]));
    let bnb = &s.snapshots.as_ref().unwrap()["BNBBUSD"];
    assert_eq!(bnb.label.as_deref(), Some("BNB/BUSD"));
    assert_eq!(bnb.change, "1.0000");
}
