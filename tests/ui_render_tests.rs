use ratatui::backend::TestBackend;
use ratatui::style::Color;
use ratatui::Terminal;

use ticker_board::binance::types::BinanceTickerPrice;
use ticker_board::event::AppEvent;
use ticker_board::model::pair::TrackedPair;
use ticker_board::ticker_set::TickerSet;
use ticker_board::ui::{self, AppState};

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn find(terminal: &Terminal<TestBackend>, needle: &str) -> Option<(u16, u16)> {
    let text = buffer_text(terminal);
    let width = terminal.backend().buffer().area.width as usize;
    text.lines().enumerate().find_map(|(y, line)| {
        line.find(needle).map(|byte_idx| {
            let x = line[..byte_idx].chars().count();
            debug_assert!(x < width);
            (x as u16, y as u16)
        })
    })
}

fn state() -> AppState {
    AppState::new(
        TickerSet::new([
            TrackedPair::new("BTCBUSD", "BTC/BUSD"),
            TrackedPair::new("ETHBUSD", "ETH/BUSD"),
        ]),
        5_000,
    )
}

fn fetched(seq: u64, btc: f64, eth: f64) -> AppEvent {
    AppEvent::PricesFetched {
        seq,
        prices: vec![
            BinanceTickerPrice {
                symbol: "BTCBUSD".to_string(),
                price: btc,
            },
            BinanceTickerPrice {
                symbol: "ETHBUSD".to_string(),
                price: eth,
            },
        ],
    }
}

#[test]
/// Verifies loading placeholder:
/// before the first fetch, tiles show their labels and a loading marker instead of a price.
fn render_loading_tiles() {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    let state = state();

    terminal
        .draw(|frame| ui::render(frame, &state))
        .expect("render should succeed");

    let text = buffer_text(&terminal);
    assert!(text.contains("BTC/BUSD"));
    assert!(text.contains("ETH/BUSD"));
    assert!(text.contains("loading..."));
    assert!(text.contains("LOADING"));
    assert!(text.contains("[Stop update]"));
}

#[test]
/// Verifies price tiles:
/// signed percent change and price are rendered with direction colours.
fn render_price_tiles_with_direction() {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    let mut state = state();
    state.apply(fetched(1, 100.0, 200.0));
    state.apply(fetched(2, 110.0, 180.0));

    terminal
        .draw(|frame| ui::render(frame, &state))
        .expect("render should succeed");

    let text = buffer_text(&terminal);
    assert!(text.contains("$110"));
    assert!(text.contains("$180"));
    assert!(!text.contains("loading..."));

    let (x, y) = find(&terminal, "+10.0000%").expect("increase rendered");
    assert_eq!(terminal.backend().buffer()[(x, y)].fg, Color::Green);
    let (x, y) = find(&terminal, "-10.0000%").expect("decrease rendered");
    assert_eq!(terminal.backend().buffer()[(x, y)].fg, Color::Red);
}

#[test]
/// Verifies paused status:
/// the status bar shows PAUSED and the control reads "Start update".
fn render_paused_status() {
    let backend = TestBackend::new(120, 30);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    let mut state = state();
    state.apply(fetched(1, 100.0, 200.0));
    state.set_polling(false);

    terminal
        .draw(|frame| ui::render(frame, &state))
        .expect("render should succeed");

    let text = buffer_text(&terminal);
    assert!(text.contains("PAUSED"));
    assert!(text.contains("[Start update]"));
    assert!(text.contains("$100"));
}
